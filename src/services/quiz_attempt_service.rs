use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::{QuizSettings, RetakePolicy};
use crate::models::domain::quiz_attempt::QuizAttempt;
use crate::models::domain::quiz_question::Answer;
use crate::models::domain::{Question, Quiz};
use crate::services::grading_service::{GradingRules, GradingService, QuizResult};

pub struct QuizAttemptService;

impl QuizAttemptService {
    /// Grade a learner's answers against a published quiz's questions.
    pub fn grade_attempt(
        quiz: &Quiz,
        questions: &[Question],
        answers: &HashMap<String, Answer>,
    ) -> AppResult<QuizResult> {
        if !quiz.is_available_for_taking() {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' is not published",
                quiz.id
            )));
        }

        // Answers for questions outside this quiz are ignored by the grader but worth noting.
        let unknown = answers
            .keys()
            .filter(|id| !questions.iter().any(|q| &q.id == *id))
            .count();
        if unknown > 0 {
            log::warn!(
                "Ignoring {} answer(s) for questions not in quiz {}",
                unknown,
                quiz.id
            );
        }

        Ok(GradingService::check_quiz_passed(
            &GradingRules::from(&quiz.settings),
            answers,
            questions,
        ))
    }

    /// Decide whether a learner may start another attempt and return its number.
    pub fn check_retake_allowed(
        settings: &QuizSettings,
        previous: &[QuizAttempt],
    ) -> AppResult<u32> {
        let taken = previous.len() as u32;

        if let Some(max_attempts) = settings.max_attempts {
            if taken >= max_attempts {
                return Err(AppError::ValidationError(format!(
                    "Maximum of {} attempt(s) reached",
                    max_attempts
                )));
            }
        }

        let allowed = match settings.retake_policy {
            RetakePolicy::Never => taken == 0,
            RetakePolicy::OnFail => previous.iter().all(|attempt| !attempt.passed),
            RetakePolicy::Unlimited => true,
        };
        if !allowed {
            return Err(AppError::ValidationError(
                "Retake not allowed by quiz settings".to_string(),
            ));
        }

        Ok(taken + 1)
    }

    /// Create a new quiz attempt from grading results
    pub fn create_attempt(
        learner_id: &str,
        quiz: &Quiz,
        attempt_number: u32,
        result: QuizResult,
    ) -> QuizAttempt {
        let now = Utc::now();
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            learner_id: learner_id.to_string(),
            quiz_id: quiz.id.clone(),
            score: result.score,
            pass_mark: quiz.settings.pass_mark,
            passed: result.passed,
            points_earned: result.points_earned,
            points_possible: result.points_possible,
            attempt_number,
            question_answers: result.question_results,
            submitted_at: now,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    /// Retake check, grading and attempt creation in one step.
    pub fn submit(
        learner_id: &str,
        quiz: &Quiz,
        questions: &[Question],
        answers: &HashMap<String, Answer>,
        previous: &[QuizAttempt],
    ) -> AppResult<QuizAttempt> {
        let attempt_number = Self::check_retake_allowed(&quiz.settings, previous)?;
        let result = Self::grade_attempt(quiz, questions, answers)?;

        log::info!(
            "Learner {} scored {} on quiz {} (attempt {})",
            learner_id,
            result.score,
            quiz.id,
            attempt_number
        );

        Ok(Self::create_attempt(learner_id, quiz, attempt_number, result))
    }
}
