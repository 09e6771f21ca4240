pub mod completion_service;
pub mod content_service;
pub mod grading_service;
pub mod progress_service;
pub mod quiz_attempt_service;

pub use completion_service::{CompletionMethod, CompletionService};
pub use content_service::ContentService;
pub use grading_service::{GradingRules, GradingService};
pub use progress_service::ProgressService;
pub use quiz_attempt_service::QuizAttemptService;
