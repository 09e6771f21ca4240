pub mod block_progress_repository;
pub mod content_repository;

pub use block_progress_repository::{
    BlockProgressRepository, InMemoryBlockProgressRepository, MongoBlockProgressRepository,
};
pub use content_repository::{
    ContentRepository, InMemoryContentRepository, MongoContentRepository,
};
