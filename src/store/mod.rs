pub mod course_tree;
pub mod question_bank;
pub mod selection;
pub mod sibling_collection;

use serde::{Deserialize, Serialize};

use crate::models::domain::{Block, Chapter, Course, Page, Question, Quiz};

pub use course_tree::CourseTree;
pub use question_bank::QuestionBank;
pub use selection::Selection;
pub use sibling_collection::{Sibling, SiblingCollection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub copy_title_suffix: String,
    pub default_pass_mark: u8,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            copy_title_suffix: " (Copy)".to_string(),
            default_pass_mark: 70,
        }
    }
}

impl StoreSettings {
    pub fn copy_title(&self, title: &str) -> String {
        format!("{}{}", title, self.copy_title_suffix)
    }
}

/// Every stored collection, as read from or written to a `ContentRepository`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub courses: Vec<Course>,
    pub chapters: Vec<Chapter>,
    pub pages: Vec<Page>,
    pub blocks: Vec<Block>,
    pub quizzes: Vec<Quiz>,
    pub questions: Vec<Question>,
}

impl ContentSnapshot {
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.quizzes.is_empty()
    }
}

/// The in-memory hierarchy the builders operate on.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pub course_content: CourseTree,
    pub question_bank: QuestionBank,
}

impl ContentStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            course_content: CourseTree::new(settings.clone()),
            question_bank: QuestionBank::new(settings),
        }
    }

    pub fn from_snapshot(snapshot: ContentSnapshot, settings: StoreSettings) -> Self {
        Self {
            course_content: CourseTree::from_parts(
                settings.clone(),
                snapshot.courses,
                snapshot.chapters,
                snapshot.pages,
                snapshot.blocks,
            ),
            question_bank: QuestionBank::from_parts(settings, snapshot.quizzes, snapshot.questions),
        }
    }

    pub fn snapshot(&self) -> ContentSnapshot {
        ContentSnapshot {
            courses: self.course_content.all_courses().to_vec(),
            chapters: self.course_content.all_chapters(),
            pages: self.course_content.all_pages(),
            blocks: self.course_content.all_blocks(),
            quizzes: self.question_bank.all_quizzes().to_vec(),
            questions: self.question_bank.all_questions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{BlockType, QuestionType, QuizKind};

    #[test]
    fn copy_title_appends_suffix() {
        let settings = StoreSettings {
            copy_title_suffix: " - copy".to_string(),
            default_pass_mark: 50,
        };
        assert_eq!(settings.copy_title("Lesson"), "Lesson - copy");
    }

    #[test]
    fn snapshot_round_trips_through_store() {
        let mut store = ContentStore::new(StoreSettings::default());
        let course = store.course_content.create_course("Algebra");
        let chapter = store
            .course_content
            .add_chapter(&course, "Equations")
            .expect("add chapter");
        let page = store.course_content.add_page(&chapter, "Linear").expect("add page");
        store
            .course_content
            .add_block(&page, "Practice", BlockType::MicroQuiz)
            .expect("add block");
        let quiz = store.question_bank.create_quiz(QuizKind::Quiz, "Check");
        store
            .question_bank
            .add_question(&quiz, "x = ?", QuestionType::ShortAnswer)
            .expect("add question");

        let snapshot = store.snapshot();
        let restored = ContentStore::from_snapshot(snapshot.clone(), StoreSettings::default());

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(
            restored.course_content.page(&page).map(|p| p.blocks_count),
            Some(1)
        );
        assert_eq!(
            restored.question_bank.quiz(&quiz).map(|q| q.questions_count),
            Some(1)
        );
    }
}
