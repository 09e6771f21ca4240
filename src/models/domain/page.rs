use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    pub id: String,
    pub chapter_id: String,
    pub title: String,
    pub order: u32,
    pub blocks_count: u32, // derived from the block collection
    pub is_required: bool,
    /// Builder-time flag; per-learner progress lives in `BlockProgress`.
    pub is_completed: bool,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn new(chapter_id: &str, title: &str, order: u32) -> Self {
        Page {
            id: Uuid::new_v4().to_string(),
            chapter_id: chapter_id.to_string(),
            title: title.to_string(),
            order,
            blocks_count: 0,
            is_required: true,
            is_completed: false,
            is_locked: false,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}
