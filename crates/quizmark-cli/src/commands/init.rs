//! The `quizmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizmark.toml
    if std::path::Path::new("quizmark.toml").exists() {
        println!("quizmark.toml already exists, skipping.");
    } else {
        std::fs::write("quizmark.toml", SAMPLE_CONFIG)?;
        println!("Created quizmark.toml");
    }

    // Create example test
    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust the scoring defaults in quizmark.toml");
    println!("  2. Run: quizmark validate --test quizzes/example.toml");
    println!("  3. Run: quizmark grade --test quizzes/example.toml --submission answers.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

# output_dir = "./quizmark-reports"

[scoring]
test_max_score = 10
# Defaults to half of test_max_score.
# pass_threshold = 5
# "tenths" or "whole"
rounding = "tenths"
"#;

const EXAMPLE_TEST: &str = r#"[test]
id = "example"
name = "Example Quiz"
description = "A short quiz to get started"
max_score = 10

[[questions]]
id = "capital"
type = "SINGLE_CHOICE"
points = 1
content = "What is the capital of France?"

[[questions.answers]]
id = "paris"
content = "Paris"
correct = true

[[questions.answers]]
id = "lyon"
content = "Lyon"

[[questions]]
id = "primes"
type = "MULTIPLE_CHOICE"
points = 2
content = "Which of these numbers are prime?"

[[questions.answers]]
id = "two"
content = "2"
correct = true

[[questions.answers]]
id = "four"
content = "4"

[[questions.answers]]
id = "seven"
content = "7"
correct = true

[[questions]]
id = "reflection"
type = "ESSAY"
points = 5
max_length = 1000
content = "Describe one thing you learned this week."
"#;
