//! Answer normalization.
//!
//! Turns whatever shape a learner's answer arrived in into a canonical list of
//! selected answer ids, so scoring only ever deals with one representation.

use std::collections::HashSet;

use crate::model::{NormalizedAnswers, Submission, UserAnswer};

/// Normalize a raw answer into an ordered list of distinct, non-empty ids.
///
/// `Empty` yields nothing, a bare id becomes a one-element list, and empty
/// strings and repeated ids are dropped (first occurrence wins).
pub fn normalize_answer(answer: &UserAnswer) -> Vec<String> {
    let ids: Vec<&str> = match answer {
        UserAnswer::Empty => return Vec::new(),
        UserAnswer::Single(id) => vec![id.as_str()],
        UserAnswer::Multiple(ids) => ids.iter().map(String::as_str).collect(),
    };

    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}

/// Normalize every answer in a submission, keyed by question id.
pub fn normalize_submission(submission: &Submission) -> NormalizedAnswers {
    submission
        .answers
        .iter()
        .map(|(question_id, answer)| (question_id.clone(), normalize_answer(answer)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_answers_are_empty() {
        assert!(normalize_answer(&UserAnswer::Empty).is_empty());
        assert!(normalize_answer(&UserAnswer::from(None::<&str>)).is_empty());
        assert!(normalize_answer(&UserAnswer::from("")).is_empty());
    }

    #[test]
    fn scalar_becomes_single_element() {
        assert_eq!(normalize_answer(&UserAnswer::from("a")), vec!["a"]);
    }

    #[test]
    fn empty_entries_filtered() {
        assert_eq!(
            normalize_answer(&UserAnswer::from(vec!["a", "", "b"])),
            vec!["a", "b"]
        );
    }

    #[test]
    fn duplicates_collapse_keeping_order() {
        assert_eq!(
            normalize_answer(&UserAnswer::from(vec!["b", "a", "b", "a"])),
            vec!["b", "a"]
        );
    }

    #[test]
    fn submission_keeps_question_keys() {
        let mut submission = Submission::default();
        submission
            .answers
            .insert("q1".into(), UserAnswer::from(vec!["x", ""]));
        submission.answers.insert("q2".into(), UserAnswer::Empty);

        let normalized = normalize_submission(&submission);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized["q1"], vec!["x"]);
        assert!(normalized["q2"].is_empty());
    }
}
