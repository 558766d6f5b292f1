//! Grading pipeline.
//!
//! raw answers → normalize → score per question → merge with existing essay
//! scores → aggregate → classify. Every step is a pure function of its inputs,
//! so one engine can grade any number of attempts concurrently.

use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::merge::{apply_essay_grades, merge_question_scores};
use crate::model::{AttemptResult, EssayGrade, ScoreMap, Submission, TestDefinition};
use crate::normalize::normalize_submission;

/// Outcome of grading one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAttempt {
    /// Score per question id, ready for persistence.
    pub question_scores: ScoreMap,
    /// Aggregate mark and pass/fail status.
    pub result: AttemptResult,
}

/// Grades attempts against a scoring configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Grade a submission, carrying forward essay scores from `existing`.
    ///
    /// The test's own `max_score`/`pass_score` take precedence over the
    /// engine configuration.
    pub fn grade(
        &self,
        test: &TestDefinition,
        submission: &Submission,
        existing: Option<&ScoreMap>,
    ) -> GradedAttempt {
        let answers = normalize_submission(submission);

        let unknown = submission
            .answers
            .keys()
            .filter(|id| test.question(id).is_none())
            .count();
        if unknown > 0 {
            tracing::warn!(
                test = %test.id,
                unknown,
                "submission answers questions that are not part of the test; ignoring them"
            );
        }

        let question_scores = merge_question_scores(&test.questions, &answers, existing);
        let result = self.aggregate_for(test, &question_scores);

        tracing::info!(
            test = %test.id,
            attempt = submission.attempt,
            earned = result.earned_points,
            total = result.total_points,
            mark = result.final_mark,
            status = %result.status,
            "graded attempt"
        );

        GradedAttempt {
            question_scores,
            result,
        }
    }

    /// Grade a submission and then apply manual essay grades before the
    /// aggregate is computed.
    pub fn grade_with_essays(
        &self,
        test: &TestDefinition,
        submission: &Submission,
        existing: Option<&ScoreMap>,
        essay_grades: &[EssayGrade],
    ) -> Result<GradedAttempt, ScoringError> {
        let graded = self.grade(test, submission, existing);
        if essay_grades.is_empty() {
            return Ok(graded);
        }
        self.regrade_essays(test, &graded.question_scores, essay_grades)
    }

    /// Apply manual essay grades to an already graded attempt and recompute
    /// the aggregate. Choice scores are left as they are.
    pub fn regrade_essays(
        &self,
        test: &TestDefinition,
        question_scores: &ScoreMap,
        essay_grades: &[EssayGrade],
    ) -> Result<GradedAttempt, ScoringError> {
        let question_scores = apply_essay_grades(&test.questions, question_scores, essay_grades)?;
        let result = self.aggregate_for(test, &question_scores);
        tracing::info!(
            test = %test.id,
            grades = essay_grades.len(),
            mark = result.final_mark,
            status = %result.status,
            "applied essay grades"
        );
        Ok(GradedAttempt {
            question_scores,
            result,
        })
    }

    fn aggregate_for(&self, test: &TestDefinition, question_scores: &ScoreMap) -> AttemptResult {
        aggregate(question_scores.values(), &self.config.for_test(test))
    }
}
