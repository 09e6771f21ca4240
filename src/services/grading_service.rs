use std::collections::{HashMap, HashSet};

use crate::models::domain::block::{MicroQuizContent, ReorderContent, ScoringMode};
use crate::models::domain::quiz::{CompletionRule, QuizSettings};
use crate::models::domain::quiz_attempt::QuizAttemptQuestion;
use crate::models::domain::quiz_question::{Answer, ChoiceOption, Question, QuestionContent};

/// Pass mark and completion rule shared by quizzes, assessments and micro-quiz blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingRules {
    pub pass_mark: u8,
    pub completion_rule: CompletionRule,
}

impl From<&QuizSettings> for GradingRules {
    fn from(settings: &QuizSettings) -> Self {
        Self {
            pass_mark: settings.pass_mark,
            completion_rule: settings.completion_rule,
        }
    }
}

impl From<&MicroQuizContent> for GradingRules {
    fn from(content: &MicroQuizContent) -> Self {
        Self {
            pass_mark: content.pass_mark,
            completion_rule: content.completion_rule,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub passed: bool,
    pub score: u8,
    pub correct_count: u32,
    pub total_questions: u32,
    pub points_earned: u32,
    pub points_possible: u32,
    pub question_results: Vec<QuizAttemptQuestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderResult {
    pub correct: bool,
    pub score: u8,
}

/// `round(100 * part / whole)` with halves rounded away from zero; `0` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}

pub struct GradingService;

impl GradingService {
    /// Scores every question all-or-nothing and compares the percentage with the pass mark.
    /// Unanswered questions count as incorrect.
    pub fn check_quiz_passed(
        rules: &GradingRules,
        answers: &HashMap<String, Answer>,
        questions: &[Question],
    ) -> QuizResult {
        let question_results: Vec<QuizAttemptQuestion> = questions
            .iter()
            .map(|question| Self::grade_question(question, answers.get(&question.id)))
            .collect();

        let correct_count = question_results.iter().filter(|r| r.is_correct).count();
        let score = percentage(correct_count, questions.len());
        let passed = match rules.completion_rule {
            CompletionRule::Attempted => true,
            CompletionRule::Passed => score >= rules.pass_mark,
        };

        QuizResult {
            passed,
            score,
            correct_count: correct_count as u32,
            total_questions: questions.len() as u32,
            points_earned: question_results.iter().map(|r| r.points_earned).sum(),
            points_possible: questions.iter().map(|q| q.points).sum(),
            question_results,
        }
    }

    pub fn check_micro_quiz(content: &MicroQuizContent, answers: &HashMap<String, Answer>) -> QuizResult {
        Self::check_quiz_passed(&GradingRules::from(content), answers, &content.questions)
    }

    /// Grade an individual question based on its answer key.
    pub fn grade_question(question: &Question, answer: Option<&Answer>) -> QuizAttemptQuestion {
        let (is_correct, needs_review) = match &question.content {
            QuestionContent::SingleChoice { options } => {
                let key = options.iter().position(|opt| opt.is_correct);
                let is_correct = match answer {
                    Some(Answer::Choice(index)) => key == Some(*index),
                    _ => false,
                };
                (is_correct, false)
            }
            QuestionContent::TrueFalse { correct_answer } => {
                // index 0 is "true", index 1 is "false"
                let key = if *correct_answer { 0 } else { 1 };
                let is_correct = match answer {
                    Some(Answer::Choice(index)) => *index == key,
                    Some(Answer::Flag(value)) => value == correct_answer,
                    _ => false,
                };
                (is_correct, false)
            }
            QuestionContent::MultiSelect { options } => {
                let is_correct = match answer {
                    Some(Answer::Choices(selected)) => Self::same_selection(options, selected),
                    Some(Answer::Choice(index)) => Self::same_selection(options, &[*index]),
                    _ => false,
                };
                (is_correct, false)
            }
            QuestionContent::ShortAnswer {
                accepted_answers,
                case_sensitive,
            } => {
                let is_correct = match answer {
                    Some(Answer::Text(text)) => {
                        Self::matches_any(text, accepted_answers, *case_sensitive)
                    }
                    _ => false,
                };
                (is_correct, false)
            }
            QuestionContent::FillBlank {
                blanks,
                case_sensitive,
                ..
            } => {
                let submitted: Vec<&String> = match answer {
                    Some(Answer::Texts(texts)) => texts.iter().collect(),
                    Some(Answer::Text(text)) => vec![text],
                    _ => Vec::new(),
                };
                let is_correct = !blanks.is_empty()
                    && submitted.len() == blanks.len()
                    && blanks.iter().zip(&submitted).all(|(blank, text)| {
                        Self::matches_any(text, &blank.accepted_answers, *case_sensitive)
                    });
                (is_correct, false)
            }
            QuestionContent::Matching { pairs } => {
                // answer[i] is the index of the answer chosen for prompt i
                let is_correct = match answer {
                    Some(Answer::Choices(chosen)) => {
                        !pairs.is_empty()
                            && chosen.len() == pairs.len()
                            && chosen.iter().enumerate().all(|(i, c)| i == *c)
                    }
                    _ => false,
                };
                (is_correct, false)
            }
            QuestionContent::Essay { .. }
            | QuestionContent::LongAnswer { .. }
            | QuestionContent::FileUpload { .. } => (false, true),
        };

        QuizAttemptQuestion {
            question_id: question.id.clone(),
            answer: answer.cloned(),
            is_correct,
            points_earned: if is_correct { question.points } else { 0 },
            needs_review,
        }
    }

    /// Compares the learner's arrangement with the key, either whole or position by position.
    pub fn check_reorder_correct(content: &ReorderContent, submitted: &[usize]) -> ReorderResult {
        let expected = &content.correct_order;
        if expected.is_empty() {
            return ReorderResult {
                correct: false,
                score: 0,
            };
        }

        let score = match content.scoring_mode {
            ScoringMode::AllOrNothing => {
                if submitted == expected.as_slice() {
                    100
                } else {
                    0
                }
            }
            ScoringMode::PartialCredit => {
                let matching = expected
                    .iter()
                    .zip(submitted)
                    .filter(|(want, got)| want == got)
                    .count();
                percentage(matching, expected.len().max(submitted.len()))
            }
        };

        ReorderResult {
            correct: score == 100,
            score,
        }
    }

    fn same_selection(options: &[ChoiceOption], selected: &[usize]) -> bool {
        let key: HashSet<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, opt)| opt.is_correct)
            .map(|(i, _)| i)
            .collect();
        let selected: HashSet<usize> = selected.iter().copied().collect();
        !key.is_empty() && key == selected
    }

    fn matches_any(text: &str, accepted: &[String], case_sensitive: bool) -> bool {
        let text = text.trim();
        accepted.iter().map(|a| a.trim()).any(|candidate| {
            if case_sensitive {
                candidate == text
            } else {
                candidate.to_lowercase() == text.to_lowercase()
            }
        })
    }
}
