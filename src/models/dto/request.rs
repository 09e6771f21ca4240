use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::block::BlockContent;
use crate::models::domain::quiz::{CompletionRule, RetakePolicy};
use crate::models::domain::quiz_question::QuestionContent;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChapterRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub is_locked: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePageRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub is_required: Option<bool>,
    pub is_completed: Option<bool>,
    pub is_locked: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBlockRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub is_required: Option<bool>,
    pub is_completed: Option<bool>,

    #[validate(custom(function = "validate_block_content"))]
    pub content: Option<BlockContent>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,

    #[validate(range(max = 1000))]
    pub points: Option<u32>,

    pub required: Option<bool>,

    pub content: Option<QuestionContent>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub duration_minutes: Option<u32>,

    #[validate(range(max = 100))]
    pub pass_mark: Option<u8>,

    pub shuffle_questions: Option<bool>,
    pub retake_policy: Option<RetakePolicy>,

    #[validate(range(min = 1))]
    pub max_attempts: Option<u32>,

    pub completion_rule: Option<CompletionRule>,
}

/// Pass marks stay within 0..=100, micro-quizzes hold only auto-gradable questions and
/// reorder keys are permutations of the item indices.
pub fn validate_block_content(content: &BlockContent) -> Result<(), ValidationError> {
    match content {
        BlockContent::MicroQuiz(quiz) if quiz.pass_mark > 100 => {
            Err(ValidationError::new("pass_mark_out_of_range"))
        }
        BlockContent::MicroQuiz(quiz)
            if quiz
                .questions
                .iter()
                .any(|q| q.question_type().is_assessment_only()) =>
        {
            Err(ValidationError::new("assessment_only_question_in_micro_quiz"))
        }
        BlockContent::DragDropReorder(reorder) => {
            let mut seen = vec![false; reorder.items.len()];
            if reorder.correct_order.len() != reorder.items.len() {
                return Err(ValidationError::new("correct_order_length_mismatch"));
            }
            for &index in &reorder.correct_order {
                match seen.get_mut(index) {
                    Some(slot) if !*slot => *slot = true,
                    _ => return Err(ValidationError::new("correct_order_not_a_permutation")),
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::block::{BlockType, ReorderContent, ScoringMode};
    use crate::models::domain::{Question, QuestionType};

    fn reorder(items: usize, correct_order: Vec<usize>) -> BlockContent {
        BlockContent::DragDropReorder(ReorderContent {
            instructions: String::new(),
            items: (0..items).map(|i| format!("Item {}", i + 1)).collect(),
            correct_order,
            scoring_mode: ScoringMode::PartialCredit,
        })
    }

    #[test]
    fn empty_title_is_rejected() {
        let request = UpdateChapterRequest {
            title: Some(String::new()),
            ..Default::default()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn absent_fields_pass_validation() {
        assert!(UpdatePageRequest::default().validate().is_ok());
        assert!(UpdateQuizRequest::default().validate().is_ok());
    }

    #[test]
    fn quiz_pass_mark_above_hundred_is_rejected() {
        let request = UpdateQuizRequest {
            pass_mark: Some(101),
            ..Default::default()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn reorder_key_must_be_a_permutation() {
        assert!(validate_block_content(&reorder(3, vec![2, 0, 1])).is_ok());
        assert!(validate_block_content(&reorder(3, vec![0, 0, 1])).is_err());
        assert!(validate_block_content(&reorder(3, vec![0, 1])).is_err());
        assert!(validate_block_content(&reorder(2, vec![0, 5])).is_err());
    }

    #[test]
    fn block_request_validates_nested_content() {
        let request = UpdateBlockRequest {
            content: Some(reorder(2, vec![1, 1])),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateBlockRequest {
            content: Some(BlockContent::default_for(BlockType::Text, 70)),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn micro_quiz_rejects_assessment_only_questions() {
        let mut content = BlockContent::default_for(BlockType::MicroQuiz, 70);
        let BlockContent::MicroQuiz(quiz) = &mut content else {
            panic!("expected micro quiz content");
        };
        quiz.questions
            .push(Question::new("block-1", "Pick one", QuestionType::SingleChoice, 1));
        assert!(validate_block_content(&content).is_ok());

        for question_type in [
            QuestionType::Essay,
            QuestionType::LongAnswer,
            QuestionType::FileUpload,
        ] {
            let mut rejected = content.clone();
            if let BlockContent::MicroQuiz(quiz) = &mut rejected {
                quiz.questions
                    .push(Question::new("block-1", "Write", question_type, 2));
            }
            let error = validate_block_content(&rejected).expect_err("assessment-only question");
            assert_eq!(error.code, "assessment_only_question_in_micro_quiz");
        }
    }
}
