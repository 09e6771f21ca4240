use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use tokio::sync::RwLock;

use crate::{db::Database, errors::AppResult, models::domain::BlockProgress};

/// Read side of the learner progress tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockProgressRepository: Send + Sync {
    async fn find_by_learner_and_block(
        &self,
        learner_id: &str,
        block_id: &str,
    ) -> AppResult<Option<BlockProgress>>;
    async fn find_by_learner_and_blocks(
        &self,
        learner_id: &str,
        block_ids: &[String],
    ) -> AppResult<Vec<BlockProgress>>;
}

pub struct MongoBlockProgressRepository {
    collection: Collection<BlockProgress>,
}

impl MongoBlockProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.content_collection("block_progress");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for block_progress collection");

        let learner_block_index = IndexModel::builder()
            .keys(doc! { "learner_id": 1, "block_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("learner_block".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(learner_block_index).await?;

        log::info!("Successfully created indexes for block_progress collection");
        Ok(())
    }
}

#[async_trait]
impl BlockProgressRepository for MongoBlockProgressRepository {
    async fn find_by_learner_and_block(
        &self,
        learner_id: &str,
        block_id: &str,
    ) -> AppResult<Option<BlockProgress>> {
        let progress = self
            .collection
            .find_one(doc! {
                "learner_id": learner_id,
                "block_id": block_id
            })
            .await?;
        Ok(progress)
    }

    async fn find_by_learner_and_blocks(
        &self,
        learner_id: &str,
        block_ids: &[String],
    ) -> AppResult<Vec<BlockProgress>> {
        if block_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .collection
            .find(doc! {
                "learner_id": learner_id,
                "block_id": { "$in": block_ids.to_vec() }
            })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }
}

/// Progress records held in memory, keyed by `(learner_id, block_id)`.
#[derive(Default)]
pub struct InMemoryBlockProgressRepository {
    records: RwLock<HashMap<(String, String), BlockProgress>>,
}

impl InMemoryBlockProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BlockProgress>) -> Self {
        let records = records
            .into_iter()
            .map(|record| ((record.learner_id.clone(), record.block_id.clone()), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Inserts or replaces the learner's record for a block.
    pub async fn record(&self, progress: BlockProgress) {
        let key = (progress.learner_id.clone(), progress.block_id.clone());
        self.records.write().await.insert(key, progress);
    }
}

#[async_trait]
impl BlockProgressRepository for InMemoryBlockProgressRepository {
    async fn find_by_learner_and_block(
        &self,
        learner_id: &str,
        block_id: &str,
    ) -> AppResult<Option<BlockProgress>> {
        let records = self.records.read().await;
        Ok(records
            .get(&(learner_id.to_string(), block_id.to_string()))
            .cloned())
    }

    async fn find_by_learner_and_blocks(
        &self,
        learner_id: &str,
        block_ids: &[String],
    ) -> AppResult<Vec<BlockProgress>> {
        let records = self.records.read().await;
        Ok(block_ids
            .iter()
            .filter_map(|block_id| records.get(&(learner_id.to_string(), block_id.clone())))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::ProgressStatus;

    fn progress(learner: &str, block: &str, status: ProgressStatus) -> BlockProgress {
        let mut record = BlockProgress::new(block, status);
        record.learner_id = learner.to_string();
        record
    }

    #[tokio::test]
    async fn in_memory_lookup_is_scoped_to_learner() {
        let repo = InMemoryBlockProgressRepository::with_records(vec![
            progress("ana", "b1", ProgressStatus::Completed),
            progress("ben", "b1", ProgressStatus::InProgress),
        ]);

        let ana = repo
            .find_by_learner_and_block("ana", "b1")
            .await
            .expect("lookup");
        assert_eq!(ana.map(|p| p.status), Some(ProgressStatus::Completed));

        let missing = repo
            .find_by_learner_and_block("cy", "b1")
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn in_memory_batch_lookup_skips_unknown_blocks() {
        let repo = InMemoryBlockProgressRepository::new();
        repo.record(progress("ana", "b1", ProgressStatus::InProgress)).await;
        repo.record(progress("ana", "b1", ProgressStatus::Completed)).await;
        repo.record(progress("ana", "b2", ProgressStatus::NotStarted)).await;

        let ids = vec!["b1".to_string(), "b3".to_string()];
        let found = repo
            .find_by_learner_and_blocks("ana", &ids)
            .await
            .expect("lookup");

        assert_eq!(found.len(), 1);
        assert!(found[0].is_completed());
    }
}
