//! Building the per-question score map for an attempt.
//!
//! Choice questions are rescored from scratch on every call. Essay scores come
//! from a human and are carried forward, so re-grading after a test edit never
//! wipes manual work. They are only capped when a question's points shrink.

use crate::error::ScoringError;
use crate::model::{EssayGrade, NormalizedAnswers, Question, QuestionScore, ScoreMap};
use crate::scorer::score_question;

/// Build a fresh score map covering exactly `questions`.
///
/// - Choice questions are scored against `answers`; only the grader feedback of
///   an existing entry is kept.
/// - Essay questions keep their existing score and feedback, or start at `0`
///   with empty feedback. A carried score above the question's current points
///   is clamped to them.
///
/// Every entry's `max_score` reflects the question's current point value.
/// Entries in `existing` for questions no longer in the test are dropped.
/// The function is pure: the same inputs always produce the same map.
pub fn merge_question_scores(
    questions: &[Question],
    answers: &NormalizedAnswers,
    existing: Option<&ScoreMap>,
) -> ScoreMap {
    questions
        .iter()
        .map(|question| {
            let previous = existing.and_then(|scores| scores.get(&question.id));
            let max_score = question.effective_points();

            let entry = if question.is_choice() {
                let selected = answers
                    .get(&question.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let score = score_question(question, selected);
                tracing::debug!(question = %question.id, score, max_score, "scored choice question");
                QuestionScore {
                    score,
                    max_score,
                    feedback: previous.and_then(|p| p.feedback.clone()),
                }
            } else {
                match previous {
                    Some(p) => {
                        let score = if p.score > max_score {
                            tracing::warn!(
                                question = %question.id,
                                carried = p.score,
                                max_score,
                                "essay score exceeds the question's current points; clamping"
                            );
                            max_score
                        } else {
                            p.score
                        };
                        QuestionScore {
                            score,
                            max_score,
                            feedback: p.feedback.clone(),
                        }
                    }
                    None => QuestionScore {
                        score: 0.0,
                        max_score,
                        feedback: Some(String::new()),
                    },
                }
            };

            (question.id.clone(), entry)
        })
        .collect()
}

/// Apply human essay grades on top of a score map, returning a new map.
///
/// Each grade must name an essay question of the test and carry a score in
/// `0..=max_score`. A grade without feedback keeps the feedback already on
/// record. The input map is left untouched; on error nothing is applied.
pub fn apply_essay_grades(
    questions: &[Question],
    scores: &ScoreMap,
    grades: &[EssayGrade],
) -> Result<ScoreMap, ScoringError> {
    let mut updated = scores.clone();

    for grade in grades {
        let question = questions
            .iter()
            .find(|q| q.id == grade.question_id)
            .ok_or_else(|| ScoringError::UnknownQuestion(grade.question_id.clone()))?;

        if question.is_choice() {
            return Err(ScoringError::NotAnEssay(question.id.clone()));
        }

        let max_score = question.effective_points();
        if !grade.score.is_finite() || grade.score < 0.0 || grade.score > max_score {
            return Err(ScoringError::ScoreOutOfRange {
                question_id: question.id.clone(),
                score: grade.score,
                max_score,
            });
        }

        let feedback = grade
            .feedback
            .clone()
            .or_else(|| updated.get(&question.id).and_then(|s| s.feedback.clone()));

        tracing::debug!(question = %question.id, score = grade.score, "applied essay grade");
        updated.insert(
            question.id.clone(),
            QuestionScore {
                score: grade.score,
                max_score,
                feedback,
            },
        );
    }

    Ok(updated)
}
