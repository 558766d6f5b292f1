//! The `quizmark compare` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::report::GradingReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_change: bool,
    format: String,
) -> Result<()> {
    let baseline = GradingReport::load_json(&baseline_path)?;
    let current = GradingReport::load_json(&current_path)?;

    if baseline.test.id != current.test.id {
        tracing::warn!(
            "comparing reports for different tests: {} vs {}",
            baseline.test.id,
            current.test.id
        );
    }

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Re-grade: mark {:.1} -> {:.1} ({:+.1}), {} -> {}",
                report.baseline_mark,
                report.current_mark,
                report.mark_delta,
                report.baseline_status,
                report.current_status
            );
            println!(
                "{} changed, {} unchanged",
                report.changes.len(),
                report.unchanged
            );

            if !report.changes.is_empty() {
                println!("\nChanged questions:");
                for c in &report.changes {
                    println!(
                        "  {} {}/{} -> {}/{} ({:+})",
                        c.question_id,
                        c.baseline_score,
                        c.baseline_max,
                        c.current_score,
                        c.current_max,
                        c.delta
                    );
                }
            }

            if !report.added.is_empty() {
                println!("\n{} added question(s)", report.added.len());
            }
            if !report.removed.is_empty() {
                println!("{} removed question(s)", report.removed.len());
            }
        }
    }

    if fail_on_change && report.has_changes() {
        std::process::exit(1);
    }

    Ok(())
}
