use std::sync::Arc;

use crate::{
    errors::AppResult,
    repositories::ContentRepository,
    store::{ContentStore, StoreSettings},
};

/// Moves the authored hierarchy between a `ContentRepository` and an in-memory `ContentStore`.
pub struct ContentService {
    repository: Arc<dyn ContentRepository>,
    settings: StoreSettings,
}

impl ContentService {
    pub fn new(repository: Arc<dyn ContentRepository>, settings: StoreSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn open(&self) -> AppResult<ContentStore> {
        let snapshot = self.repository.load().await?;
        log::info!(
            "Opened content store with {} course(s), {} block(s) and {} quiz(zes)",
            snapshot.courses.len(),
            snapshot.blocks.len(),
            snapshot.quizzes.len()
        );
        Ok(ContentStore::from_snapshot(snapshot, self.settings.clone()))
    }

    pub async fn persist(&self, store: &ContentStore) -> AppResult<()> {
        let snapshot = store.snapshot();
        self.repository.save(&snapshot).await?;
        log::debug!("Persisted content store");
        Ok(())
    }

    /// Saves the store one last time, then releases the repository.
    pub async fn close(&self, store: &ContentStore) -> AppResult<()> {
        self.persist(store).await?;
        self.repository.close().await
    }
}
