use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question belonging to a quiz, an assessment or a micro-quiz block.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Question {
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub points: u32,
    pub required: bool,
    pub order: u32,
    pub content: QuestionContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn new(parent_id: &str, title: &str, question_type: QuestionType, order: u32) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            points: 1,
            required: true,
            order,
            content: QuestionContent::default_for(question_type),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.content.question_type()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultiSelect,
    TrueFalse,
    ShortAnswer,
    FillBlank,
    Matching,
    Essay,
    LongAnswer,
    FileUpload,
}

impl QuestionType {
    pub const ALL: [QuestionType; 9] = [
        QuestionType::SingleChoice,
        QuestionType::MultiSelect,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
        QuestionType::FillBlank,
        QuestionType::Matching,
        QuestionType::Essay,
        QuestionType::LongAnswer,
        QuestionType::FileUpload,
    ];

    /// Essay, long-answer and file-upload questions only exist on assessments.
    pub fn is_assessment_only(&self) -> bool {
        matches!(
            self,
            QuestionType::Essay | QuestionType::LongAnswer | QuestionType::FileUpload
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "Single choice",
            QuestionType::MultiSelect => "Multi-select",
            QuestionType::TrueFalse => "True / False",
            QuestionType::ShortAnswer => "Short answer",
            QuestionType::FillBlank => "Fill in the blank",
            QuestionType::Matching => "Matching",
            QuestionType::Essay => "Essay",
            QuestionType::LongAnswer => "Long answer",
            QuestionType::FileUpload => "File upload",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ChoiceOption {
    pub text: String,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>, // why this option is right or wrong
}

impl ChoiceOption {
    pub fn new(text: &str, is_correct: bool) -> Self {
        Self {
            text: text.to_string(),
            is_correct,
            explanation: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct BlankKey {
    pub accepted_answers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MatchingPair {
    pub prompt: String,
    pub answer: String,
}

/// Answer key and presentation data, one variant per question type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionContent {
    SingleChoice {
        options: Vec<ChoiceOption>,
    },
    MultiSelect {
        options: Vec<ChoiceOption>,
    },
    TrueFalse {
        correct_answer: bool,
    },
    ShortAnswer {
        accepted_answers: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    FillBlank {
        text: String,
        blanks: Vec<BlankKey>,
        #[serde(default)]
        case_sensitive: bool,
    },
    Matching {
        pairs: Vec<MatchingPair>,
    },
    Essay {
        min_words: Option<u32>,
        max_words: Option<u32>,
        rubric: Option<String>,
    },
    LongAnswer {
        max_words: Option<u32>,
        sample_answer: Option<String>,
    },
    FileUpload {
        accepted_file_types: Vec<String>,
        max_file_size_mb: u32,
    },
}

impl QuestionContent {
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::SingleChoice => QuestionContent::SingleChoice {
                options: vec![
                    ChoiceOption::new("Option 1", true),
                    ChoiceOption::new("Option 2", false),
                ],
            },
            QuestionType::MultiSelect => QuestionContent::MultiSelect {
                options: vec![
                    ChoiceOption::new("Option 1", true),
                    ChoiceOption::new("Option 2", false),
                    ChoiceOption::new("Option 3", false),
                ],
            },
            QuestionType::TrueFalse => QuestionContent::TrueFalse {
                correct_answer: true,
            },
            QuestionType::ShortAnswer => QuestionContent::ShortAnswer {
                accepted_answers: Vec::new(),
                case_sensitive: false,
            },
            QuestionType::FillBlank => QuestionContent::FillBlank {
                text: String::new(),
                blanks: Vec::new(),
                case_sensitive: false,
            },
            QuestionType::Matching => QuestionContent::Matching { pairs: Vec::new() },
            QuestionType::Essay => QuestionContent::Essay {
                min_words: None,
                max_words: None,
                rubric: None,
            },
            QuestionType::LongAnswer => QuestionContent::LongAnswer {
                max_words: None,
                sample_answer: None,
            },
            QuestionType::FileUpload => QuestionContent::FileUpload {
                accepted_file_types: vec!["pdf".to_string()],
                max_file_size_mb: 10,
            },
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionContent::SingleChoice { .. } => QuestionType::SingleChoice,
            QuestionContent::MultiSelect { .. } => QuestionType::MultiSelect,
            QuestionContent::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionContent::ShortAnswer { .. } => QuestionType::ShortAnswer,
            QuestionContent::FillBlank { .. } => QuestionType::FillBlank,
            QuestionContent::Matching { .. } => QuestionType::Matching,
            QuestionContent::Essay { .. } => QuestionType::Essay,
            QuestionContent::LongAnswer { .. } => QuestionType::LongAnswer,
            QuestionContent::FileUpload { .. } => QuestionType::FileUpload,
        }
    }
}

/// A learner's submitted value for one question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Choice(usize),
    Choices(Vec<usize>),
    Text(String),
    Texts(Vec<String>),
}
