pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod services;
pub mod store;

#[cfg(test)]
pub mod test_utils;
