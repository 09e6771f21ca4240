use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz::CompletionRule;
use crate::models::domain::quiz_question::Question;

/// The smallest unit of learning content inside a page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Block {
    pub id: String,
    pub page_id: String,
    pub title: String,
    pub order: u32,
    pub is_required: bool,
    pub is_completed: bool,
    pub content: BlockContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Block {
    pub fn new(
        page_id: &str,
        title: &str,
        block_type: BlockType,
        order: u32,
        default_pass_mark: u8,
    ) -> Self {
        Block {
            id: Uuid::new_v4().to_string(),
            page_id: page_id.to_string(),
            title: title.to_string(),
            order,
            is_required: true,
            is_completed: false,
            content: BlockContent::default_for(block_type, default_pass_mark),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Text,
    Video,
    Image,
    Resource,
    Divider,
    MicroQuiz,
    DragDropReorder,
    Whiteboard,
    Reflection,
    QaThread,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::Text,
        BlockType::Video,
        BlockType::Image,
        BlockType::Resource,
        BlockType::Divider,
        BlockType::MicroQuiz,
        BlockType::DragDropReorder,
        BlockType::Whiteboard,
        BlockType::Reflection,
        BlockType::QaThread,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Text => "Text",
            BlockType::Video => "Video",
            BlockType::Image => "Image",
            BlockType::Resource => "Resource",
            BlockType::Divider => "Divider",
            BlockType::MicroQuiz => "Micro quiz",
            BlockType::DragDropReorder => "Drag & drop reorder",
            BlockType::Whiteboard => "Whiteboard",
            BlockType::Reflection => "Reflection",
            BlockType::QaThread => "Q&A thread",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    AllOrNothing,
    PartialCredit,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MicroQuizContent {
    pub questions: Vec<Question>,
    pub pass_mark: u8,
    #[serde(default)]
    pub completion_rule: CompletionRule,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ReorderContent {
    pub instructions: String,
    /// Items in the order they are shown to the learner.
    pub items: Vec<String>,
    /// `correct_order[i]` is the index into `items` that belongs at position `i`.
    pub correct_order: Vec<usize>,
    #[serde(default)]
    pub scoring_mode: ScoringMode,
}

/// Payload of a block, one variant per block type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Text {
        body: String,
    },
    Video {
        url: String,
        duration_seconds: Option<u32>,
        caption: Option<String>,
    },
    Image {
        url: String,
        alt_text: String,
        caption: Option<String>,
    },
    Resource {
        url: String,
        file_name: String,
        description: Option<String>,
    },
    Divider,
    MicroQuiz(MicroQuizContent),
    DragDropReorder(ReorderContent),
    Whiteboard {
        prompt: String,
    },
    Reflection {
        prompt: String,
        min_words: Option<u32>,
    },
    QaThread {
        prompt: String,
    },
}

impl BlockContent {
    pub fn default_for(block_type: BlockType, default_pass_mark: u8) -> Self {
        match block_type {
            BlockType::Text => BlockContent::Text {
                body: String::new(),
            },
            BlockType::Video => BlockContent::Video {
                url: String::new(),
                duration_seconds: None,
                caption: None,
            },
            BlockType::Image => BlockContent::Image {
                url: String::new(),
                alt_text: String::new(),
                caption: None,
            },
            BlockType::Resource => BlockContent::Resource {
                url: String::new(),
                file_name: String::new(),
                description: None,
            },
            BlockType::Divider => BlockContent::Divider,
            BlockType::MicroQuiz => BlockContent::MicroQuiz(MicroQuizContent {
                questions: Vec::new(),
                pass_mark: default_pass_mark,
                completion_rule: CompletionRule::Passed,
            }),
            BlockType::DragDropReorder => BlockContent::DragDropReorder(ReorderContent {
                instructions: "Drag the items into the correct order.".to_string(),
                items: vec![
                    "Item 1".to_string(),
                    "Item 2".to_string(),
                    "Item 3".to_string(),
                ],
                correct_order: vec![0, 1, 2],
                scoring_mode: ScoringMode::AllOrNothing,
            }),
            BlockType::Whiteboard => BlockContent::Whiteboard {
                prompt: String::new(),
            },
            BlockType::Reflection => BlockContent::Reflection {
                prompt: String::new(),
                min_words: None,
            },
            BlockType::QaThread => BlockContent::QaThread {
                prompt: String::new(),
            },
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Text { .. } => BlockType::Text,
            BlockContent::Video { .. } => BlockType::Video,
            BlockContent::Image { .. } => BlockType::Image,
            BlockContent::Resource { .. } => BlockType::Resource,
            BlockContent::Divider => BlockType::Divider,
            BlockContent::MicroQuiz(_) => BlockType::MicroQuiz,
            BlockContent::DragDropReorder(_) => BlockType::DragDropReorder,
            BlockContent::Whiteboard { .. } => BlockType::Whiteboard,
            BlockContent::Reflection { .. } => BlockType::Reflection,
            BlockContent::QaThread { .. } => BlockType::QaThread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_matches_requested_type() {
        for block_type in BlockType::ALL {
            let content = BlockContent::default_for(block_type, 70);
            assert_eq!(content.block_type(), block_type);
        }
    }

    #[test]
    fn micro_quiz_default_uses_supplied_pass_mark() {
        let block = Block::new("page-1", "Check", BlockType::MicroQuiz, 1, 80);

        match block.content {
            BlockContent::MicroQuiz(quiz) => {
                assert_eq!(quiz.pass_mark, 80);
                assert!(quiz.questions.is_empty());
            }
            other => panic!("expected micro quiz content, got {:?}", other),
        }
    }

    #[test]
    fn reorder_default_is_a_valid_permutation() {
        let content = BlockContent::default_for(BlockType::DragDropReorder, 70);
        let BlockContent::DragDropReorder(reorder) = content else {
            panic!("expected reorder content");
        };

        let mut sorted = reorder.correct_order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..reorder.items.len()).collect::<Vec<_>>());
    }

    #[test]
    fn block_content_round_trips_with_type_tag() {
        let block = Block::new("page-1", "Order the steps", BlockType::DragDropReorder, 2, 70);

        let json = serde_json::to_value(&block).expect("block should serialize");
        assert_eq!(json["content"]["type"], "drag_drop_reorder");
        assert_eq!(json["content"]["scoring_mode"], "all_or_nothing");

        let parsed: Block = serde_json::from_value(json).expect("block should deserialize");
        assert_eq!(parsed, block);
    }

    #[test]
    fn divider_serializes_as_bare_tag() {
        let json = serde_json::to_value(BlockContent::Divider).expect("divider should serialize");
        assert_eq!(json, serde_json::json!({ "type": "divider" }));
    }
}
