use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{
    config::{collection_name, Config},
    errors::AppResult,
};

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
    collection_prefix: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
            collection_prefix: config.collection_prefix.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    /// Collection for one entity kind, e.g. `content_blocks`.
    pub fn content_collection<T>(&self, kind: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.get_collection(&collection_name(&self.collection_prefix, kind))
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Closes the connection pool. Other clones of this handle become unusable.
    pub async fn shutdown(&self) {
        log::info!("Shutting down MongoDB client");
        self.client.clone().shutdown().await;
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}
