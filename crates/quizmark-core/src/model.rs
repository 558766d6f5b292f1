//! Core data model types for quizmark.
//!
//! Questions and their answer options come from the test author, user answers
//! come from the learner, and question scores plus the attempt result are what
//! the engine produces.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// The kind of a question. Determines how (and whether) it is auto-scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Essay,
}

impl QuestionType {
    /// Choice questions are scored automatically; essays are graded by hand.
    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::Essay)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::SingleChoice => write!(f, "SINGLE_CHOICE"),
            QuestionType::MultipleChoice => write!(f, "MULTIPLE_CHOICE"),
            QuestionType::Essay => write!(f, "ESSAY"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SINGLE_CHOICE" | "SINGLE" => Ok(QuestionType::SingleChoice),
            "MULTIPLE_CHOICE" | "MULTIPLE" => Ok(QuestionType::MultipleChoice),
            "ESSAY" => Ok(QuestionType::Essay),
            _ => Err(ScoringError::InvalidQuestionType(s.to_string())),
        }
    }
}

impl TryFrom<String> for QuestionType {
    type Error = ScoringError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Identifier, unique within its question.
    pub id: String,
    /// Whether selecting this option is (part of) the correct response.
    #[serde(default)]
    pub correct: bool,
    /// Display text.
    #[serde(default)]
    pub content: String,
}

/// A question as authored in a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Maximum points this question contributes. Unset or non-positive means 1.
    #[serde(default)]
    pub points: Option<f64>,
    /// Answer options. Only meaningful for choice questions.
    #[serde(default)]
    pub answers: Vec<Answer>,
    /// Maximum essay length. Validation concern only, never used in scoring.
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Question text.
    #[serde(default)]
    pub content: String,
}

impl Question {
    /// The point value used for scoring, falling back to 1.
    pub fn effective_points(&self) -> f64 {
        self.points.filter(|p| *p > 0.0).unwrap_or(1.0)
    }

    /// Ids of all answer options flagged correct.
    pub fn correct_answer_ids(&self) -> HashSet<&str> {
        self.answers
            .iter()
            .filter(|a| a.correct)
            .map(|a| a.id.as_str())
            .collect()
    }

    pub fn is_choice(&self) -> bool {
        self.question_type.is_choice()
    }
}

/// A learner's raw answer to one question, as it arrives from the client.
///
/// Deserializes from `null`, a single string, or an array of strings (with
/// `null` entries dropped). Essay text arrives as `Single`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawUserAnswer")]
pub enum UserAnswer {
    #[default]
    Empty,
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserAnswer {
    Many(Vec<Option<String>>),
    One(String),
    Nothing,
}

impl From<RawUserAnswer> for UserAnswer {
    fn from(raw: RawUserAnswer) -> Self {
        match raw {
            RawUserAnswer::Many(ids) => UserAnswer::Multiple(ids.into_iter().flatten().collect()),
            RawUserAnswer::One(id) => UserAnswer::Single(id),
            RawUserAnswer::Nothing => UserAnswer::Empty,
        }
    }
}

impl From<&str> for UserAnswer {
    fn from(id: &str) -> Self {
        UserAnswer::Single(id.to_string())
    }
}

impl From<Vec<&str>> for UserAnswer {
    fn from(ids: Vec<&str>) -> Self {
        UserAnswer::Multiple(ids.into_iter().map(String::from).collect())
    }
}

impl<T: Into<UserAnswer>> From<Option<T>> for UserAnswer {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Computed or human-assigned score for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    /// Points awarded, in `0..=max_score`.
    pub score: f64,
    /// The question's point value.
    pub max_score: f64,
    /// Grader comment. Survives re-grading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Per-question scores keyed by question id.
///
/// Ordered so that iteration, equality and serialized output are deterministic.
pub type ScoreMap = BTreeMap<String, QuestionScore>;

/// Normalized answers keyed by question id.
pub type NormalizedAnswers = HashMap<String, Vec<String>>;

/// Pass/fail classification of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Passed,
    Failed,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::Passed => write!(f, "PASSED"),
            AttemptStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Test-level result of folding all question scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub earned_points: f64,
    pub total_points: f64,
    /// Earned/total scaled to the test maximum and rounded.
    pub final_mark: f64,
    pub status: AttemptStatus,
}

/// A test as loaded from an authoring file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Overrides the configured maximum mark for this test.
    #[serde(default)]
    pub max_score: Option<f64>,
    /// Overrides the configured pass threshold for this test.
    #[serde(default)]
    pub pass_score: Option<f64>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl TestDefinition {
    /// Sum of all question point values, answered or not.
    pub fn total_points(&self) -> f64 {
        self.questions.iter().map(Question::effective_points).sum()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// One learner's answers for one attempt at a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default = "default_attempt")]
    pub attempt: u32,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Raw answers keyed by question id. Unanswered questions may be absent.
    #[serde(default)]
    pub answers: HashMap<String, UserAnswer>,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            attempt: default_attempt(),
            user_id: None,
            answers: HashMap::new(),
        }
    }
}

fn default_attempt() -> u32 {
    1
}

/// A human grader's score for an essay question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayGrade {
    pub question_id: String,
    pub score: f64,
    #[serde(default)]
    pub feedback: Option<String>,
}
