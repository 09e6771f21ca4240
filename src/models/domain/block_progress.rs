use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-learner progress on one block, produced by the progress tracker.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlockProgress {
    #[serde(default)]
    pub learner_id: String,
    pub block_id: String,
    pub status: ProgressStatus,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl BlockProgress {
    pub fn new(block_id: &str, status: ProgressStatus) -> Self {
        Self {
            learner_id: String::new(),
            block_id: block_id.to_string(),
            status,
            attempts: 0,
            last_score: None,
            updated_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProgressStatus::Completed
    }
}
