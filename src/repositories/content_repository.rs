use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Block, Chapter, Course, Page, Question, Quiz},
    store::ContentSnapshot,
};

/// Loads and stores the whole authored hierarchy at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn load(&self) -> AppResult<ContentSnapshot>;
    async fn save(&self, snapshot: &ContentSnapshot) -> AppResult<()>;
    async fn close(&self) -> AppResult<()>;
}

pub struct MongoContentRepository {
    db: Database,
    courses: Collection<Course>,
    chapters: Collection<Chapter>,
    pages: Collection<Page>,
    blocks: Collection<Block>,
    quizzes: Collection<Quiz>,
    questions: Collection<Question>,
}

impl MongoContentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            courses: db.content_collection("courses"),
            chapters: db.content_collection("chapters"),
            pages: db.content_collection("pages"),
            blocks: db.content_collection("blocks"),
            quizzes: db.content_collection("quizzes"),
            questions: db.content_collection("questions"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for content collections");

        create_id_index(&self.courses).await?;
        create_id_index(&self.chapters).await?;
        create_id_index(&self.pages).await?;
        create_id_index(&self.blocks).await?;
        create_id_index(&self.quizzes).await?;
        create_id_index(&self.questions).await?;

        let parent_indexes = [
            (self.chapters.clone_with_type::<()>(), "course_id"),
            (self.pages.clone_with_type::<()>(), "chapter_id"),
            (self.blocks.clone_with_type::<()>(), "page_id"),
            (self.questions.clone_with_type::<()>(), "parent_id"),
        ];
        for (collection, parent_field) in parent_indexes {
            let mut keys = doc! {};
            keys.insert(parent_field, 1);
            keys.insert("order", 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_order", parent_field))
                        .build(),
                )
                .build();
            collection.create_index(index).await?;
        }

        log::info!("Successfully created indexes for content collections");
        Ok(())
    }
}

async fn create_id_index<T: Send + Sync>(collection: &Collection<T>) -> AppResult<()> {
    let index = IndexModel::builder()
        .keys(doc! { "id": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .name("id_unique".to_string())
                .build(),
        )
        .build();
    collection.create_index(index).await?;
    Ok(())
}

async fn find_all<T>(collection: &Collection<T>) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let items = collection
        .find(doc! {})
        .sort(doc! { "order": 1 })
        .await?
        .try_collect()
        .await?;
    Ok(items)
}

/// Upserts every item by its `id`. Existing documents stay until [`prune_stale`] runs.
async fn upsert_all<T, F>(collection: &Collection<T>, items: &[T], id_of: F) -> AppResult<()>
where
    T: Serialize + Send + Sync,
    F: Fn(&T) -> &str,
{
    for item in items {
        collection
            .replace_one(doc! { "id": id_of(item) }, item)
            .upsert(true)
            .await?;
    }
    Ok(())
}

/// Matches documents whose `id` is not in `ids`. An empty `ids` matches everything.
fn stale_filter<'a>(ids: impl IntoIterator<Item = &'a str>) -> Document {
    let ids: Vec<&str> = ids.into_iter().collect();
    doc! { "id": { "$nin": ids } }
}

async fn prune_stale<T, F>(collection: &Collection<T>, items: &[T], id_of: F) -> AppResult<u64>
where
    T: Send + Sync,
    F: Fn(&T) -> &str,
{
    let result = collection
        .delete_many(stale_filter(items.iter().map(id_of)))
        .await?;
    Ok(result.deleted_count)
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn load(&self) -> AppResult<ContentSnapshot> {
        let snapshot = ContentSnapshot {
            courses: find_all(&self.courses).await?,
            chapters: find_all(&self.chapters).await?,
            pages: find_all(&self.pages).await?,
            blocks: find_all(&self.blocks).await?,
            quizzes: find_all(&self.quizzes).await?,
            questions: find_all(&self.questions).await?,
        };
        log::debug!(
            "Loaded {} course(s) and {} quiz(zes) from {}",
            snapshot.courses.len(),
            snapshot.quizzes.len(),
            self.db.db_name()
        );
        Ok(snapshot)
    }

    /// Writes every entity before removing any; a failure part way leaves the previous
    /// content in place, possibly alongside some of the new documents.
    async fn save(&self, snapshot: &ContentSnapshot) -> AppResult<()> {
        upsert_all(&self.courses, &snapshot.courses, |c| c.id.as_str()).await?;
        upsert_all(&self.chapters, &snapshot.chapters, |c| c.id.as_str()).await?;
        upsert_all(&self.pages, &snapshot.pages, |p| p.id.as_str()).await?;
        upsert_all(&self.blocks, &snapshot.blocks, |b| b.id.as_str()).await?;
        upsert_all(&self.quizzes, &snapshot.quizzes, |q| q.id.as_str()).await?;
        upsert_all(&self.questions, &snapshot.questions, |q| q.id.as_str()).await?;

        // leaves first so an interrupted prune never strands children
        let pruned = prune_stale(&self.questions, &snapshot.questions, |q| q.id.as_str()).await?
            + prune_stale(&self.quizzes, &snapshot.quizzes, |q| q.id.as_str()).await?
            + prune_stale(&self.blocks, &snapshot.blocks, |b| b.id.as_str()).await?
            + prune_stale(&self.pages, &snapshot.pages, |p| p.id.as_str()).await?
            + prune_stale(&self.chapters, &snapshot.chapters, |c| c.id.as_str()).await?
            + prune_stale(&self.courses, &snapshot.courses, |c| c.id.as_str()).await?;

        log::info!(
            "Saved content snapshot to {} ({} stale document(s) removed)",
            self.db.db_name(),
            pruned
        );
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.db.shutdown().await;
        Ok(())
    }
}

/// Process-local repository, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryContentRepository {
    snapshot: RwLock<ContentSnapshot>,
    closed: AtomicBool,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ContentSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.is_closed() {
            return Err(AppError::DatabaseError(
                "Content repository is closed".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn load(&self) -> AppResult<ContentSnapshot> {
        self.ensure_open()?;
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &ContentSnapshot) -> AppResult<()> {
        self.ensure_open()?;
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
