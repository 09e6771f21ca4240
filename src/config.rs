use std::env;

use crate::store::StoreSettings;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub collection_prefix: String,
    pub copy_title_suffix: String,
    pub default_pass_mark: u8,
}

impl Config {
    /// Reads configuration from the environment, loading a `.env` file first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "coursework-local".to_string()),
            collection_prefix: env::var("CONTENT_COLLECTION_PREFIX")
                .unwrap_or_else(|_| "content".to_string()),
            copy_title_suffix: env::var("COPY_TITLE_SUFFIX")
                .unwrap_or_else(|_| " (Copy)".to_string()),
            default_pass_mark: env::var("DEFAULT_PASS_MARK")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|p: &u8| *p <= 100)
                .unwrap_or(70),
        }
    }

    /// Name of the collection holding one entity kind, e.g. `content_chapters`.
    pub fn collection_name(&self, kind: &str) -> String {
        collection_name(&self.collection_prefix, kind)
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            copy_title_suffix: self.copy_title_suffix.clone(),
            default_pass_mark: self.default_pass_mark,
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "coursework-test".to_string(),
            collection_prefix: "content".to_string(),
            copy_title_suffix: " (Copy)".to_string(),
            default_pass_mark: 70,
        }
    }
}

pub(crate) fn collection_name(prefix: &str, kind: &str) -> String {
    if prefix.is_empty() {
        kind.to_string()
    } else {
        format!("{}_{}", prefix, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(config.default_pass_mark <= 100);
    }

    #[test]
    fn test_collection_name_uses_prefix() {
        let mut config = Config::test_config();
        assert_eq!(config.collection_name("blocks"), "content_blocks");

        config.collection_prefix.clear();
        assert_eq!(config.collection_name("blocks"), "blocks");
    }

    #[test]
    fn test_store_settings_follow_config() {
        let config = Config::test_config();
        let settings = config.store_settings();

        assert_eq!(settings.copy_title_suffix, " (Copy)");
        assert_eq!(settings.default_pass_mark, 70);
    }
}
