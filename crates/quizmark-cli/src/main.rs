//! quizmark CLI — grade quiz attempts from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizmark", version, about = "Quiz grading and mark aggregation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a test
    Grade {
        /// Path to the test .toml file
        #[arg(long)]
        test: PathBuf,

        /// Path to the submission JSON
        #[arg(long)]
        submission: PathBuf,

        /// Previously persisted question scores (JSON) to carry essay grades from
        #[arg(long)]
        existing: Option<PathBuf>,

        /// Manual essay grades (JSON array)
        #[arg(long)]
        essay_grades: Option<PathBuf>,

        /// Override the maximum mark
        #[arg(long)]
        max_score: Option<f64>,

        /// Override the pass threshold
        #[arg(long)]
        pass_threshold: Option<f64>,

        /// Directory to write the grading report to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two grading reports of the same attempt
    Compare {
        /// Earlier report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Re-graded report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any score changed
        #[arg(long)]
        fail_on_change: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate test TOML files
    Validate {
        /// Path to test file or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// Create starter config and example test
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmark=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            test,
            submission,
            existing,
            essay_grades,
            max_score,
            pass_threshold,
            output,
            format,
            config,
        } => commands::grade::execute(commands::grade::GradeArgs {
            test,
            submission,
            existing,
            essay_grades,
            max_score,
            pass_threshold,
            output,
            format,
            config,
        }),
        Commands::Compare {
            baseline,
            current,
            fail_on_change,
            format,
        } => commands::compare::execute(baseline, current, fail_on_change, format),
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
