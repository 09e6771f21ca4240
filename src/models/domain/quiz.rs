use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quiz or an assessment: a container of ordered questions plus settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub kind: QuizKind,
    pub title: String,
    pub description: Option<String>,
    pub settings: QuizSettings,
    pub status: QuizStatus,
    pub questions_count: u32, // derived from the question collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    Quiz,
    Assessment,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RetakePolicy {
    Never,
    OnFail,
    Unlimited,
}

/// `Attempted` marks any submission as passed while still reporting the real score.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    #[default]
    Passed,
    Attempted,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSettings {
    pub duration_minutes: Option<u32>,
    pub pass_mark: u8,
    pub shuffle_questions: bool,
    pub retake_policy: RetakePolicy,
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub completion_rule: CompletionRule,
}

impl QuizSettings {
    pub fn with_pass_mark(pass_mark: u8) -> Self {
        Self {
            duration_minutes: None,
            pass_mark,
            shuffle_questions: false,
            retake_policy: RetakePolicy::Unlimited,
            max_attempts: None,
            completion_rule: CompletionRule::Passed,
        }
    }
}

impl Quiz {
    pub fn new_draft(kind: QuizKind, title: &str, pass_mark: u8) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.to_string(),
            description: None,
            settings: QuizSettings::with_pass_mark(pass_mark),
            status: QuizStatus::Draft,
            questions_count: 0,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_available_for_taking(&self) -> bool {
        matches!(self.status, QuizStatus::Published)
    }
}
