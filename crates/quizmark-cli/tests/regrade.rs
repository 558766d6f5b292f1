//! Re-grade comparison: persist a report, grade again, diff the two.

use std::path::Path;

use quizmark_core::model::{AttemptStatus, EssayGrade};
use quizmark_core::parser::{parse_submission, parse_test};
use quizmark_core::report::GradingReport;
use quizmark_core::ScoreEngine;

const QUIZZES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../quizzes");

#[test]
fn essay_regrade_is_reported() {
    let quizzes = Path::new(QUIZZES);
    let test = parse_test(&quizzes.join("fractions.toml")).unwrap();
    let submission = parse_submission(&quizzes.join("submissions/fractions-alice.json")).unwrap();
    let engine = ScoreEngine::default();

    let dir = tempfile::tempdir().unwrap();
    let baseline_path = dir.path().join("baseline.json");
    let baseline = GradingReport::new(&test, &submission, engine.grade(&test, &submission, None));
    baseline.save_json(&baseline_path).unwrap();

    let loaded = GradingReport::load_json(&baseline_path).unwrap();
    assert_eq!(loaded.id, baseline.id);
    assert_eq!(loaded.user_id.as_deref(), Some("alice"));

    let regraded = engine
        .regrade_essays(
            &test,
            &loaded.question_scores,
            &[EssayGrade {
                question_id: "explain".into(),
                score: 4.0,
                feedback: None,
            }],
        )
        .unwrap();
    let current = GradingReport::new(&test, &submission, regraded);

    let diff = current.compare(&loaded);
    assert!(diff.has_changes());
    assert!(diff.status_changed());
    assert_eq!(diff.baseline_status, AttemptStatus::Failed);
    assert_eq!(diff.current_status, AttemptStatus::Passed);
    assert_eq!(diff.unchanged, 2);
    assert_eq!(diff.changes.len(), 1);
    assert_eq!(diff.changes[0].question_id, "explain");
    assert_eq!(diff.changes[0].delta, 4.0);
    assert_eq!(diff.mark_delta, 4.0);

    let md = diff.to_markdown();
    assert!(md.contains("| explain | 0/8 | 4/8 | +4 |"));
}

#[test]
fn identical_regrade_has_no_changes() {
    let quizzes = Path::new(QUIZZES);
    let test = parse_test(&quizzes.join("fractions.toml")).unwrap();
    let submission = parse_submission(&quizzes.join("submissions/fractions-bob.json")).unwrap();
    let engine = ScoreEngine::default();

    let first = GradingReport::new(&test, &submission, engine.grade(&test, &submission, None));
    let second = GradingReport::new(
        &test,
        &submission,
        engine.grade(&test, &submission, Some(&first.question_scores)),
    );

    let diff = second.compare(&first);
    assert!(!diff.has_changes());
    assert_eq!(diff.unchanged, 3);
    assert!(diff.added.is_empty() && diff.removed.is_empty());
}
