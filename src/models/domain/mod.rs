pub mod block;
pub mod block_progress;
pub mod chapter;
pub mod course;
pub mod page;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use block::{Block, BlockContent, BlockType};
pub use block_progress::{BlockProgress, ProgressStatus};
pub use chapter::Chapter;
pub use course::Course;
pub use page::Page;
pub use quiz::{Quiz, QuizKind, QuizStatus};
pub use quiz_attempt::QuizAttempt;
pub use quiz_question::{Answer, Question, QuestionContent, QuestionType};
