//! Per-question scoring.
//!
//! All-or-nothing: a choice question earns its full point value when the
//! selection is correct and zero otherwise. Essays are never auto-scored.

use std::collections::HashSet;

use crate::model::{Question, QuestionType};

/// Whether a normalized selection is the correct response to a question.
///
/// - Single choice: exactly one id selected, and it is a correct option.
/// - Multiple choice: the selected set equals the correct set. Order does not
///   matter; subsets and supersets are wrong.
/// - Essay: never.
///
/// Ids that do not belong to the question simply fail to match.
pub fn is_answer_correct(question: &Question, selected: &[String]) -> bool {
    let correct = question.correct_answer_ids();
    match question.question_type {
        QuestionType::SingleChoice => {
            selected.len() == 1 && correct.contains(selected[0].as_str())
        }
        QuestionType::MultipleChoice => {
            let chosen: HashSet<&str> = selected.iter().map(String::as_str).collect();
            chosen == correct
        }
        QuestionType::Essay => false,
    }
}

/// Score one question against a normalized selection.
///
/// Returns the question's effective point value when correct, else `0`.
/// Essays always return `0`; their real score comes from a human grader and
/// must not be overwritten with this value.
pub fn score_question(question: &Question, selected: &[String]) -> f64 {
    if is_answer_correct(question, selected) {
        question.effective_points()
    } else {
        0.0
    }
}
