//! Mark aggregation and pass/fail classification.

use crate::config::ScoringConfig;
use crate::model::{AttemptResult, AttemptStatus, QuestionScore};

/// Fold question scores into a test-level result.
///
/// mark = earned / total * test_max_score, rounded per `config.rounding`;
/// zero when there is nothing to earn. The attempt passes when the rounded
/// mark reaches the pass threshold.
///
/// Scores are not clamped. A manually entered essay score above its
/// question's maximum can push the mark past `test_max_score`; validate
/// grades with [`crate::merge::apply_essay_grades`] to rule that out.
pub fn aggregate<'a, I>(scores: I, config: &ScoringConfig) -> AttemptResult
where
    I: IntoIterator<Item = &'a QuestionScore>,
{
    let (earned_points, total_points) = scores
        .into_iter()
        .fold((0.0f64, 0.0f64), |(earned, total), s| {
            (earned + s.score, total + s.max_score)
        });

    if earned_points > total_points {
        tracing::warn!(
            earned_points,
            total_points,
            "earned points exceed total points; mark will exceed the test maximum"
        );
    }

    let raw_mark = if total_points > 0.0 {
        earned_points / total_points * config.test_max_score
    } else {
        0.0
    };
    let final_mark = config.rounding.apply(raw_mark);

    let status = if final_mark >= config.pass_threshold() {
        AttemptStatus::Passed
    } else {
        AttemptStatus::Failed
    };

    AttemptResult {
        earned_points,
        total_points,
        final_mark,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkRounding;

    fn qs(score: f64, max_score: f64) -> QuestionScore {
        QuestionScore {
            score,
            max_score,
            feedback: None,
        }
    }

    #[test]
    fn empty_input_fails_with_zero() {
        let scores: Vec<QuestionScore> = Vec::new();
        let result = aggregate(&scores, &ScoringConfig::default());
        assert_eq!(result.earned_points, 0.0);
        assert_eq!(result.total_points, 0.0);
        assert_eq!(result.final_mark, 0.0);
        assert_eq!(result.status, AttemptStatus::Failed);
    }

    #[test]
    fn perfect_attempt_passes() {
        let config = ScoringConfig::new(10.0).with_pass_threshold(5.0);
        let result = aggregate(&[qs(10.0, 10.0)], &config);
        assert_eq!(result.earned_points, 10.0);
        assert_eq!(result.total_points, 10.0);
        assert_eq!(result.final_mark, 10.0);
        assert_eq!(result.status, AttemptStatus::Passed);
    }

    #[test]
    fn quarter_marks_fail() {
        let config = ScoringConfig::new(10.0).with_pass_threshold(5.0);
        let result = aggregate(&[qs(5.0, 10.0), qs(0.0, 10.0)], &config);
        assert_eq!(result.earned_points, 5.0);
        assert_eq!(result.total_points, 20.0);
        assert_eq!(result.final_mark, 2.5);
        assert_eq!(result.status, AttemptStatus::Failed);
    }

    #[test]
    fn rounds_to_one_decimal() {
        let result = aggregate(
            &[qs(1.0, 1.0), qs(0.0, 1.0), qs(0.0, 1.0)],
            &ScoringConfig::default(),
        );
        assert_eq!(result.final_mark, 3.3);

        let result = aggregate(
            &[qs(1.0, 1.0), qs(1.0, 1.0), qs(0.0, 1.0)],
            &ScoringConfig::default(),
        );
        assert_eq!(result.final_mark, 6.7);
    }

    #[test]
    fn whole_rounding_policy() {
        let config = ScoringConfig::default().with_rounding(MarkRounding::Whole);
        let result = aggregate(&[qs(2.0, 3.0)], &config);
        assert_eq!(result.final_mark, 7.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let result = aggregate(&[qs(1.0, 2.0)], &ScoringConfig::default());
        assert_eq!(result.final_mark, 5.0);
        assert_eq!(result.status, AttemptStatus::Passed);
    }

    #[test]
    fn rounding_happens_before_classification() {
        // 49.96 rounds to 50.0 and therefore passes.
        let config = ScoringConfig::new(100.0).with_pass_threshold(50.0);
        let result = aggregate(&[qs(49.96, 100.0)], &config);
        assert_eq!(result.final_mark, 50.0);
        assert_eq!(result.status, AttemptStatus::Passed);
    }

    #[test]
    fn scales_to_configured_maximum() {
        let config = ScoringConfig::new(100.0);
        let result = aggregate(&[qs(3.0, 4.0)], &config);
        assert_eq!(result.final_mark, 75.0);
        assert_eq!(result.status, AttemptStatus::Passed);
    }

    #[test]
    fn unclamped_when_essay_overgraded() {
        let result = aggregate(&[qs(12.0, 8.0)], &ScoringConfig::default());
        assert_eq!(result.final_mark, 15.0);
    }
}
