//! The `quizmark grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizmark_core::config::load_config_from;
use quizmark_core::model::QuestionType;
use quizmark_core::parser;
use quizmark_core::report::GradingReport;
use quizmark_core::ScoreEngine;

pub struct GradeArgs {
    pub test: PathBuf,
    pub submission: PathBuf,
    pub existing: Option<PathBuf>,
    pub essay_grades: Option<PathBuf>,
    pub max_score: Option<f64>,
    pub pass_threshold: Option<f64>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut test = parser::parse_test(&args.test)?;
    // Command-line overrides beat both the config file and the test file.
    if let Some(max) = args.max_score {
        anyhow::ensure!(max.is_finite() && max > 0.0, "max score must be positive");
        test.max_score = Some(max);
    }
    if let Some(threshold) = args.pass_threshold {
        test.pass_score = Some(threshold);
    }
    for w in parser::validate_test(&test) {
        tracing::warn!(
            question = w.question_id.as_deref().unwrap_or("-"),
            "{}",
            w.message
        );
    }

    let submission = parser::parse_submission(&args.submission)?;
    let existing = args
        .existing
        .as_deref()
        .map(parser::load_score_map)
        .transpose()?;
    let essay_grades = args
        .essay_grades
        .as_deref()
        .map(parser::load_essay_grades)
        .transpose()?
        .unwrap_or_default();

    let engine = ScoreEngine::new(config.scoring);
    let graded = engine
        .grade_with_essays(&test, &submission, existing.as_ref(), &essay_grades)
        .context("failed to apply essay grades")?;

    let report = GradingReport::new(&test, &submission, graded);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_summary(&test, &report),
    }

    if let Some(dir) = args.output.or(config.output_dir) {
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!(
            "{}-attempt{}-{timestamp}.json",
            report.test.id, report.attempt
        ));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(test: &quizmark_core::model::TestDefinition, report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Score", "Max", "Feedback"]);

    for question in &test.questions {
        let Some(score) = report.question_scores.get(&question.id) else {
            continue;
        };
        let kind = match question.question_type {
            QuestionType::SingleChoice => "single",
            QuestionType::MultipleChoice => "multiple",
            QuestionType::Essay => "essay",
        };
        table.add_row(vec![
            Cell::new(&question.id),
            Cell::new(kind),
            Cell::new(score.score),
            Cell::new(score.max_score),
            Cell::new(score.feedback.as_deref().unwrap_or("")),
        ]);
    }

    println!("Test: {} (attempt {})", report.test.name, report.attempt);
    println!("{table}");

    let result = &report.result;
    println!(
        "Points: {}/{}  Mark: {:.1}  Status: {}",
        result.earned_points, result.total_points, result.final_mark, result.status
    );
}
