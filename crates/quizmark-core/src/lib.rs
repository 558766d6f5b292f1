//! quizmark-core — Answer normalization, question scoring, and mark aggregation.
//!
//! This crate defines the data model for tests, submissions and scores, and
//! the pure grading pipeline that the quizmark CLI and embedding applications
//! build on.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod scorer;

pub use aggregate::aggregate;
pub use config::{MarkRounding, QuizmarkConfig, ScoringConfig};
pub use engine::{GradedAttempt, ScoreEngine};
pub use error::ScoringError;
pub use merge::{apply_essay_grades, merge_question_scores};
pub use normalize::normalize_answer;
pub use scorer::score_question;
