//! Test definition and grading input loaders.
//!
//! Tests are authored as TOML; submissions, existing scores and essay grades
//! are JSON documents produced by the hosting application.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Answer, EssayGrade, Question, QuestionType, ScoreMap, Submission, TestDefinition,
};

/// Intermediate TOML structure for parsing test files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    pass_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    max_length: Option<u32>,
    #[serde(default)]
    answers: Vec<TomlAnswer>,
}

#[derive(Debug, Deserialize)]
struct TomlAnswer {
    id: String,
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    content: String,
}

/// Parse a single TOML file into a `TestDefinition`.
pub fn parse_test(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test file: {}", path.display()))?;

    parse_test_str(&content, path)
}

/// Parse a TOML string into a `TestDefinition` (useful for testing).
pub fn parse_test_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let question_type: QuestionType = q
                .question_type
                .parse()
                .with_context(|| format!("question '{}' in {}", q.id, source_path.display()))?;

            let answers = q
                .answers
                .into_iter()
                .map(|a| Answer {
                    id: a.id,
                    correct: a.correct,
                    content: a.content,
                })
                .collect();

            Ok(Question {
                id: q.id,
                question_type,
                points: q.points,
                answers,
                max_length: q.max_length,
                content: q.content,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(max) = parsed.test.max_score {
        anyhow::ensure!(
            max.is_finite() && max > 0.0,
            "max_score must be positive, got {max}: {}",
            source_path.display()
        );
    }

    Ok(TestDefinition {
        id: parsed.test.id,
        name: parsed.test.name,
        description: parsed.test.description,
        max_score: parsed.test.max_score,
        pass_score: parsed.test.pass_score,
        questions,
    })
}

/// Recursively load all `.toml` test files from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            tests.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test(&path) {
                Ok(test) => tests.push(test),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// Load a learner submission from a JSON file.
pub fn parse_submission(path: &Path) -> Result<Submission> {
    read_json(path, "submission")
}

/// Load a previously persisted score map from a JSON file.
pub fn load_score_map(path: &Path) -> Result<ScoreMap> {
    read_json(path, "score map")
}

/// Load manual essay grades from a JSON array.
pub fn load_essay_grades(path: &Path) -> Result<Vec<EssayGrade>> {
    read_json(path, "essay grades")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))
}

/// A warning from test validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test for authoring mistakes that scoring would silently absorb.
pub fn validate_test(test: &TestDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |question_id: Option<&str>, message: String| {
        warnings.push(ValidationWarning {
            question_id: question_id.map(String::from),
            message,
        });
    };

    if let (Some(max), Some(pass)) = (test.max_score, test.pass_score) {
        if pass > max {
            warn(
                None,
                format!("pass_score {pass} exceeds max_score {max}; no attempt can pass"),
            );
        }
    }
    if test.max_score.is_some_and(|m| m <= 0.0) {
        warn(None, "max_score must be positive".into());
    }
    if test.questions.is_empty() {
        warn(None, "test has no questions".into());
    }

    let mut seen_ids = HashSet::new();
    for question in &test.questions {
        let id = Some(question.id.as_str());

        if !seen_ids.insert(&question.id) {
            warn(id, format!("duplicate question ID: {}", question.id));
        }

        if question.points.is_some_and(|p| p <= 0.0) {
            warn(id, "points must be positive; defaulting to 1".into());
        }

        let mut seen_answers = HashSet::new();
        for a in &question.answers {
            if !seen_answers.insert(&a.id) {
                warn(id, format!("duplicate answer ID: {}", a.id));
            }
        }

        let correct = question.answers.iter().filter(|a| a.correct).count();
        match question.question_type {
            QuestionType::SingleChoice | QuestionType::MultipleChoice if correct == 0 => {
                warn(
                    id,
                    "no correct answer configured; the question can never be scored".into(),
                );
            }
            QuestionType::SingleChoice if correct > 1 => {
                warn(
                    id,
                    format!(
                        "{correct} correct answers on a single-choice question; only one can be selected"
                    ),
                );
            }
            QuestionType::Essay if !question.answers.is_empty() => {
                warn(id, "answers on an essay question are ignored".into());
            }
            _ => {}
        }

        if question.question_type == QuestionType::Essay && question.max_length == Some(0) {
            warn(id, "max_length of 0 allows no answer".into());
        }
    }

    warnings
}
