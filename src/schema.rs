use schemars::{schema_for, Schema};

use crate::models::domain::{BlockContent, QuestionContent};

/// JSON schema of the block content union, for validating editor payloads.
pub fn block_content_schema() -> Schema {
    schema_for!(BlockContent)
}

pub fn question_content_schema() -> Schema {
    schema_for!(QuestionContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_schema_lists_every_tag() {
        let json = serde_json::to_string(&block_content_schema()).expect("schema serializes");

        assert!(json.contains("micro_quiz"));
        assert!(json.contains("drag_drop_reorder"));
        assert!(json.contains("qa_thread"));
    }

    #[test]
    fn question_schema_lists_every_tag() {
        let json = serde_json::to_string(&question_content_schema()).expect("schema serializes");

        assert!(json.contains("single_choice"));
        assert!(json.contains("fill_blank"));
        assert!(json.contains("file_upload"));
    }
}
