use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chapter {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub order: u32,
    pub pages_count: u32, // derived from the page collection
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Chapter {
    pub fn new(course_id: &str, title: &str, order: u32) -> Self {
        Chapter {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title: title.to_string(),
            order,
            pages_count: 0,
            is_locked: false,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}
