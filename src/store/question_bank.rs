use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionType, Quiz, QuizKind, QuizStatus};
use crate::models::dto::request::{UpdateQuestionRequest, UpdateQuizRequest};
use crate::store::selection;
use crate::store::sibling_collection::SiblingCollection;
use crate::store::StoreSettings;

/// Quizzes and assessments with their ordered questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    settings: StoreSettings,
    quizzes: Vec<Quiz>,
    questions: SiblingCollection<Question>,
    selected_question: Option<String>,
}

impl QuestionBank {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn from_parts(settings: StoreSettings, quizzes: Vec<Quiz>, questions: Vec<Question>) -> Self {
        let mut bank = Self {
            settings,
            quizzes,
            questions: SiblingCollection::new(questions),
            selected_question: None,
        };
        let quiz_ids: Vec<String> = bank.quizzes.iter().map(|q| q.id.clone()).collect();
        for id in &quiz_ids {
            bank.sync_questions_count(id);
        }
        bank
    }

    pub fn all_quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn all_questions(&self) -> Vec<Question> {
        self.questions.to_vec()
    }

    // Quizzes and assessments

    pub fn create_quiz(&mut self, kind: QuizKind, title: &str) -> String {
        let quiz = Quiz::new_draft(kind, title, self.settings.default_pass_mark);
        let id = quiz.id.clone();
        self.quizzes.push(quiz);
        log::info!("Created {:?} {}", kind, id);
        id
    }

    pub fn quiz(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|quiz| quiz.id == id)
    }

    pub fn quizzes(&self, kind: QuizKind) -> Vec<&Quiz> {
        self.quizzes.iter().filter(|quiz| quiz.kind == kind).collect()
    }

    pub fn update_quiz(&mut self, id: &str, request: UpdateQuizRequest) -> AppResult<()> {
        request.validate()?;

        let quiz = self.quiz_mut(id)?;
        if let Some(title) = request.title {
            quiz.title = title;
        }
        if let Some(description) = request.description {
            quiz.description = Some(description);
        }
        if let Some(duration) = request.duration_minutes {
            quiz.settings.duration_minutes = Some(duration);
        }
        if let Some(pass_mark) = request.pass_mark {
            quiz.settings.pass_mark = pass_mark;
        }
        if let Some(shuffle) = request.shuffle_questions {
            quiz.settings.shuffle_questions = shuffle;
        }
        if let Some(policy) = request.retake_policy {
            quiz.settings.retake_policy = policy;
        }
        if let Some(max_attempts) = request.max_attempts {
            quiz.settings.max_attempts = Some(max_attempts);
        }
        if let Some(rule) = request.completion_rule {
            quiz.settings.completion_rule = rule;
        }
        quiz.modified_at = Some(Utc::now());
        Ok(())
    }

    /// Removes the quiz and every question under it. Unknown ids are a no-op.
    pub fn delete_quiz(&mut self, id: &str) {
        let Some(position) = self.quizzes.iter().position(|quiz| quiz.id == id) else {
            log::debug!("Quiz {} already absent, nothing to delete", id);
            return;
        };
        self.quizzes.remove(position);
        let removed = self.questions.remove_children(id);
        selection::repair(&mut self.selected_question, &removed, &self.questions);
        log::info!("Deleted quiz {} with {} questions", id, removed.len());
    }

    pub fn publish_quiz(&mut self, id: &str) -> AppResult<()> {
        let quiz = self.quiz_mut(id)?;
        if quiz.status == QuizStatus::Archived {
            return Err(AppError::ValidationError(format!(
                "archived quiz '{}' cannot be published",
                id
            )));
        }
        if quiz.questions_count == 0 {
            return Err(AppError::ValidationError(format!(
                "quiz '{}' has no questions",
                id
            )));
        }
        quiz.status = QuizStatus::Published;
        quiz.modified_at = Some(Utc::now());
        log::info!("Published quiz {}", id);
        Ok(())
    }

    pub fn archive_quiz(&mut self, id: &str) -> AppResult<()> {
        let quiz = self.quiz_mut(id)?;
        quiz.status = QuizStatus::Archived;
        quiz.modified_at = Some(Utc::now());
        log::info!("Archived quiz {}", id);
        Ok(())
    }

    // Questions

    pub fn questions(&self, quiz_id: &str) -> Vec<&Question> {
        self.questions.children(quiz_id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn add_question(
        &mut self,
        quiz_id: &str,
        title: &str,
        question_type: QuestionType,
    ) -> AppResult<String> {
        self.check_question_allowed(quiz_id, question_type)?;
        let id = self
            .questions
            .append(Question::new(quiz_id, title, question_type, 0));
        self.sync_questions_count(quiz_id);
        log::info!("Added {:?} question {} to {}", question_type, id, quiz_id);
        Ok(id)
    }

    pub fn insert_question(
        &mut self,
        quiz_id: &str,
        title: &str,
        question_type: QuestionType,
        index: usize,
    ) -> AppResult<String> {
        self.check_question_allowed(quiz_id, question_type)?;
        let id = self
            .questions
            .insert_at(Question::new(quiz_id, title, question_type, 0), index);
        self.sync_questions_count(quiz_id);
        log::info!(
            "Inserted {:?} question {} into {} at {}",
            question_type,
            id,
            quiz_id,
            index
        );
        Ok(id)
    }

    /// Merges the request into the question. A content payload must keep the question's type.
    pub fn update_question(&mut self, id: &str, request: UpdateQuestionRequest) -> AppResult<()> {
        request.validate()?;

        let question = self
            .questions
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("Question", id))?;

        if let Some(content) = &request.content {
            if content.question_type() != question.question_type() {
                return Err(AppError::InvalidShape(format!(
                    "question '{}' is {:?} but received {:?} content",
                    id,
                    question.question_type(),
                    content.question_type()
                )));
            }
        }

        if let Some(title) = request.title {
            question.title = title;
        }
        if let Some(points) = request.points {
            question.points = points;
        }
        if let Some(required) = request.required {
            question.required = required;
        }
        if let Some(content) = request.content {
            question.content = content;
        }
        question.modified_at = Some(Utc::now());
        Ok(())
    }

    pub fn delete_question(&mut self, id: &str) {
        let Some(question) = self.questions.remove(id) else {
            log::debug!("Question {} already absent, nothing to delete", id);
            return;
        };
        self.sync_questions_count(&question.parent_id);
        selection::repair(
            &mut self.selected_question,
            std::slice::from_ref(&question),
            &self.questions,
        );
        log::info!("Deleted question {}", id);
    }

    /// Renumbers the questions of a quiz; questions missing from `ordered_ids` are deleted.
    pub fn reorder_questions(&mut self, quiz_id: &str, ordered_ids: &[String]) -> AppResult<()> {
        self.quiz_mut(quiz_id)?;
        for dropped in self.questions.apply_order(quiz_id, ordered_ids) {
            self.delete_question(&dropped);
        }
        log::debug!("Reordered questions of {}", quiz_id);
        Ok(())
    }

    pub fn duplicate_question(&mut self, id: &str) -> AppResult<String> {
        let source = self
            .questions
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Question", id))?;

        let mut copy = source.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.title = self.settings.copy_title(&source.title);
        copy.created_at = Some(Utc::now());
        copy.modified_at = Some(Utc::now());
        let new_id = self.questions.append(copy);

        self.sync_questions_count(&source.parent_id);
        log::info!("Duplicated question {} as {}", id, new_id);
        Ok(new_id)
    }

    pub fn selected_question(&self) -> Option<&str> {
        self.selected_question.as_deref()
    }

    pub fn select_question(&mut self, question_id: Option<&str>) -> AppResult<()> {
        if let Some(id) = question_id {
            if !self.questions.contains(id) {
                return Err(AppError::not_found("Question", id));
            }
        }
        self.selected_question = question_id.map(str::to_string);
        Ok(())
    }

    fn check_question_allowed(&self, quiz_id: &str, question_type: QuestionType) -> AppResult<()> {
        let quiz = self
            .quiz(quiz_id)
            .ok_or_else(|| AppError::not_found("Quiz", quiz_id))?;
        if quiz.kind == QuizKind::Quiz && question_type.is_assessment_only() {
            return Err(AppError::ValidationError(format!(
                "{} questions are only available on assessments",
                question_type.label()
            )));
        }
        Ok(())
    }

    fn quiz_mut(&mut self, id: &str) -> AppResult<&mut Quiz> {
        self.quizzes
            .iter_mut()
            .find(|quiz| quiz.id == id)
            .ok_or_else(|| AppError::not_found("Quiz", id))
    }

    fn sync_questions_count(&mut self, quiz_id: &str) {
        let count = self.questions.count(quiz_id);
        if let Some(quiz) = self.quizzes.iter_mut().find(|quiz| quiz.id == quiz_id) {
            quiz.questions_count = count;
        }
    }
}
