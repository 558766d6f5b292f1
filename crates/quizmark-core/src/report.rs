//! Grading report types with JSON persistence and re-grade comparison.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::GradedAttempt;
use crate::model::{AttemptResult, AttemptStatus, ScoreMap, Submission, TestDefinition};

/// A persisted record of one graded attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the attempt was graded.
    pub created_at: DateTime<Utc>,
    /// Summary of the test.
    pub test: TestSummary,
    /// Attempt number.
    pub attempt: u32,
    /// The learner, when known.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Score per question id.
    pub question_scores: ScoreMap,
    /// Aggregate mark and status.
    pub result: AttemptResult,
}

/// Summary of a test (without the question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl GradingReport {
    /// Build a report for a freshly graded attempt.
    pub fn new(test: &TestDefinition, submission: &Submission, graded: GradedAttempt) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test: TestSummary {
                id: test.id.clone(),
                name: test.name.clone(),
                question_count: test.questions.len(),
            },
            attempt: submission.attempt,
            user_id: submission.user_id.clone(),
            question_scores: graded.question_scores,
            result: graded.result,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this (re-graded) report against an earlier one.
    pub fn compare(&self, baseline: &GradingReport) -> RegradeReport {
        let ids: BTreeSet<&String> = baseline
            .question_scores
            .keys()
            .chain(self.question_scores.keys())
            .collect();

        let mut changes = Vec::new();
        let mut unchanged = 0usize;
        let mut added = Vec::new();
        let mut removed = Vec::new();

        for id in ids {
            match (baseline.question_scores.get(id), self.question_scores.get(id)) {
                (Some(before), Some(after)) => {
                    let delta = after.score - before.score;
                    if delta.abs() > f64::EPSILON || before.max_score != after.max_score {
                        changes.push(ScoreChange {
                            question_id: id.clone(),
                            baseline_score: before.score,
                            current_score: after.score,
                            baseline_max: before.max_score,
                            current_max: after.max_score,
                            delta,
                        });
                    } else {
                        unchanged += 1;
                    }
                }
                (None, Some(_)) => added.push(id.clone()),
                (Some(_), None) => removed.push(id.clone()),
                (None, None) => {}
            }
        }

        RegradeReport {
            baseline_mark: baseline.result.final_mark,
            current_mark: self.result.final_mark,
            mark_delta: self.result.final_mark - baseline.result.final_mark,
            baseline_status: baseline.result.status,
            current_status: self.result.status,
            changes,
            unchanged,
            added,
            removed,
        }
    }
}

/// Result of comparing two grading reports for the same attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegradeReport {
    pub baseline_mark: f64,
    pub current_mark: f64,
    pub mark_delta: f64,
    pub baseline_status: AttemptStatus,
    pub current_status: AttemptStatus,
    /// Questions whose score or point value moved.
    pub changes: Vec<ScoreChange>,
    /// Questions scored identically in both reports.
    pub unchanged: usize,
    /// Questions only in the current report.
    pub added: Vec<String>,
    /// Questions only in the baseline report.
    pub removed: Vec<String>,
}

/// A question whose score changed between two gradings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub question_id: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub baseline_max: f64,
    pub current_max: f64,
    pub delta: f64,
}

impl RegradeReport {
    /// Returns true if the re-grade moved any score, the mark, or the question set.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
            || !self.added.is_empty()
            || !self.removed.is_empty()
            || self.mark_delta.abs() > f64::EPSILON
    }

    /// Returns true if the attempt moved between passed and failed.
    pub fn status_changed(&self) -> bool {
        self.baseline_status != self.current_status
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Mark:** {:.1} -> {:.1} ({:+.1}), {} -> {}\n\n",
            self.baseline_mark,
            self.current_mark,
            self.mark_delta,
            self.baseline_status,
            self.current_status
        ));
        md.push_str(&format!(
            "**Summary:** {} changed, {} unchanged, {} added, {} removed\n\n",
            self.changes.len(),
            self.unchanged,
            self.added.len(),
            self.removed.len()
        ));

        if !self.changes.is_empty() {
            md.push_str("### Changed questions\n\n");
            md.push_str("| Question | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in &self.changes {
                md.push_str(&format!(
                    "| {} | {}/{} | {}/{} | {:+} |\n",
                    c.question_id,
                    c.baseline_score,
                    c.baseline_max,
                    c.current_score,
                    c.current_max,
                    c.delta
                ));
            }
            md.push('\n');
        }

        if !self.added.is_empty() {
            md.push_str(&format!("Added: {}\n", self.added.join(", ")));
        }
        if !self.removed.is_empty() {
            md.push_str(&format!("Removed: {}\n", self.removed.join(", ")));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionScore;

    fn make_report(scores: &[(&str, f64, f64)], final_mark: f64) -> GradingReport {
        let question_scores: ScoreMap = scores
            .iter()
            .map(|(id, score, max_score)| {
                (
                    id.to_string(),
                    QuestionScore {
                        score: *score,
                        max_score: *max_score,
                        feedback: None,
                    },
                )
            })
            .collect();
        let earned_points = scores.iter().map(|s| s.1).sum();
        let total_points = scores.iter().map(|s| s.2).sum();

        GradingReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            test: TestSummary {
                id: "test".into(),
                name: "Test".into(),
                question_count: scores.len(),
            },
            attempt: 1,
            user_id: None,
            question_scores,
            result: AttemptResult {
                earned_points,
                total_points,
                final_mark,
                status: if final_mark >= 5.0 {
                    AttemptStatus::Passed
                } else {
                    AttemptStatus::Failed
                },
            },
        }
    }

    #[test]
    fn compare_identical_reports() {
        let report = make_report(&[("q1", 1.0, 1.0), ("q2", 0.0, 1.0)], 5.0);
        let diff = report.compare(&report.clone());
        assert!(diff.changes.is_empty());
        assert_eq!(diff.unchanged, 2);
        assert!(!diff.has_changes());
    }

    #[test]
    fn compare_with_changed_score() {
        let baseline = make_report(&[("q1", 0.0, 1.0), ("q2", 0.0, 1.0)], 0.0);
        let current = make_report(&[("q1", 1.0, 1.0), ("q2", 0.0, 1.0)], 5.0);

        let diff = current.compare(&baseline);
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].question_id, "q1");
        assert_eq!(diff.changes[0].delta, 1.0);
        assert_eq!(diff.mark_delta, 5.0);
        assert!(diff.status_changed());
    }

    #[test]
    fn compare_with_added_and_removed() {
        let baseline = make_report(&[("old", 1.0, 1.0)], 10.0);
        let current = make_report(&[("new", 1.0, 1.0)], 10.0);

        let diff = current.compare(&baseline);
        assert_eq!(diff.added, vec!["new"]);
        assert_eq!(diff.removed, vec!["old"]);
        assert!(diff.has_changes());
    }

    #[test]
    fn point_value_change_is_reported() {
        let baseline = make_report(&[("q1", 1.0, 1.0)], 10.0);
        let current = make_report(&[("q1", 1.0, 2.0)], 5.0);
        let diff = current.compare(&baseline);
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].delta, 0.0);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(&[("q1", 1.0, 1.0)], 10.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradingReport::load_json(&path).unwrap();

        assert_eq!(loaded.test.id, "test");
        assert_eq!(loaded.question_scores, report.question_scores);
        assert_eq!(loaded.result, report.result);
    }

    #[test]
    fn markdown_output() {
        let baseline = make_report(&[("q1", 0.0, 1.0)], 0.0);
        let current = make_report(&[("q1", 1.0, 1.0)], 10.0);
        let md = current.compare(&baseline).to_markdown();
        assert!(md.contains("Changed questions"));
        assert!(md.contains("| q1 | 0/1 | 1/1 | +1 |"));
        assert!(md.contains("FAILED -> PASSED"));
    }
}
