use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::Answer;

/// A graded submission of a quiz or assessment by one learner.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub learner_id: String,
    pub quiz_id: String,
    pub score: u8,
    pub pass_mark: u8,
    pub passed: bool,
    pub points_earned: u32,
    pub points_possible: u32,
    pub attempt_number: u32,
    pub question_answers: Vec<QuizAttemptQuestion>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Outcome of grading a single question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttemptQuestion {
    pub question_id: String,
    pub answer: Option<Answer>,
    pub is_correct: bool,
    pub points_earned: u32,
    /// Open-ended questions are never auto-credited and wait for a marker.
    pub needs_review: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_attempt(passed: bool, score: u8, pass_mark: u8) -> QuizAttempt {
        QuizAttempt {
            id: "attempt-1".to_string(),
            learner_id: "learner-1".to_string(),
            quiz_id: "quiz-1".to_string(),
            score,
            pass_mark,
            passed,
            points_earned: 1,
            points_possible: 2,
            attempt_number: 1,
            question_answers: vec![QuizAttemptQuestion {
                question_id: "q-1".to_string(),
                answer: Some(Answer::Choice(1)),
                is_correct: score > 0,
                points_earned: 1,
                needs_review: false,
            }],
            submitted_at: Utc::now(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    #[test]
    fn quiz_attempt_round_trip_serialization_preserves_grading_fields() {
        let attempt = make_attempt(true, 50, 50);

        let json = serde_json::to_string(&attempt).expect("attempt should serialize");
        let parsed: QuizAttempt = serde_json::from_str(&json).expect("attempt should deserialize");

        assert_eq!(parsed.score, 50);
        assert_eq!(parsed.pass_mark, 50);
        assert!(parsed.passed);
        assert_eq!(parsed.question_answers.len(), 1);
        assert_eq!(parsed.question_answers[0].answer, Some(Answer::Choice(1)));
    }

    #[test]
    fn quiz_attempt_can_represent_failed_attempt() {
        let attempt = make_attempt(false, 0, 70);

        assert!(!attempt.passed);
        assert!(attempt.score < attempt.pass_mark);
        assert!(!attempt.question_answers[0].is_correct);
    }
}
