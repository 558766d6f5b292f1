//! Scoring error types.
//!
//! Scoring itself never fails on malformed-but-present data: missing answers,
//! unknown answer ids and questions without a correct option all degrade to a
//! score of zero. These errors cover precondition violations at the edges,
//! where question data is ingested or human grades are applied.

use thiserror::Error;

/// Errors raised by the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A question type string was not one of the supported kinds.
    #[error("invalid question type: {0}")]
    InvalidQuestionType(String),

    /// A rounding policy string was not recognised.
    #[error("invalid rounding policy: {0}")]
    InvalidRounding(String),

    /// A grade referenced a question that is not part of the test.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// A manual grade was supplied for a question that is auto-scored.
    #[error("question {0} is not an essay question and cannot be graded manually")]
    NotAnEssay(String),

    /// A manual grade fell outside `0..=max_score`.
    #[error("score {score} for question {question_id} is outside 0..={max_score}")]
    ScoreOutOfRange {
        question_id: String,
        score: f64,
        max_score: f64,
    },
}

impl ScoringError {
    /// Returns the question id the error refers to, if any.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            ScoringError::UnknownQuestion(id) | ScoringError::NotAnEssay(id) => Some(id),
            ScoringError::ScoreOutOfRange { question_id, .. } => Some(question_id),
            ScoringError::InvalidQuestionType(_) | ScoringError::InvalidRounding(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            ScoringError::InvalidQuestionType("TRUE_FALSE".into()).to_string(),
            "invalid question type: TRUE_FALSE"
        );
        let err = ScoringError::ScoreOutOfRange {
            question_id: "q3".into(),
            score: 9.0,
            max_score: 8.0,
        };
        assert_eq!(err.to_string(), "score 9 for question q3 is outside 0..=8");
        assert_eq!(err.question_id(), Some("q3"));
    }

    #[test]
    fn question_id_absent_for_type_errors() {
        assert_eq!(
            ScoringError::InvalidQuestionType("x".into()).question_id(),
            None
        );
    }
}
