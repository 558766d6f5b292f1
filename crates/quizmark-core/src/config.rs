//! Scoring configuration and config file loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::TestDefinition;

/// How the scaled mark is rounded before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkRounding {
    /// Nearest 0.1, half up.
    #[default]
    Tenths,
    /// Nearest whole number, half up.
    Whole,
}

impl MarkRounding {
    /// Round a non-negative mark according to this policy.
    pub fn apply(self, mark: f64) -> f64 {
        match self {
            MarkRounding::Tenths => (mark * 10.0).round() / 10.0,
            MarkRounding::Whole => mark.round(),
        }
    }
}

impl fmt::Display for MarkRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkRounding::Tenths => write!(f, "tenths"),
            MarkRounding::Whole => write!(f, "whole"),
        }
    }
}

impl FromStr for MarkRounding {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tenths" | "decimal" | "0.1" => Ok(MarkRounding::Tenths),
            "whole" | "integer" | "1" => Ok(MarkRounding::Whole),
            other => Err(ScoringError::InvalidRounding(other.to_string())),
        }
    }
}

/// Parameters of mark aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// The mark a perfect attempt receives.
    #[serde(default = "default_test_max_score")]
    pub test_max_score: f64,
    /// Minimum mark for a pass. `None` means half of `test_max_score`.
    #[serde(default)]
    pub pass_threshold: Option<f64>,
    #[serde(default)]
    pub rounding: MarkRounding,
}

fn default_test_max_score() -> f64 {
    10.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            test_max_score: default_test_max_score(),
            pass_threshold: None,
            rounding: MarkRounding::default(),
        }
    }
}

impl ScoringConfig {
    pub fn new(test_max_score: f64) -> Self {
        Self {
            test_max_score,
            ..Self::default()
        }
    }

    pub fn with_pass_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = Some(threshold);
        self
    }

    pub fn with_rounding(mut self, rounding: MarkRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// The effective pass threshold.
    pub fn pass_threshold(&self) -> f64 {
        self.pass_threshold.unwrap_or(self.test_max_score / 2.0)
    }

    /// Apply a test's own `max_score`/`pass_score` on top of this config.
    ///
    /// A test that overrides only its maximum gets a threshold of half that
    /// maximum unless this config pins one explicitly. A non-positive test
    /// maximum is ignored.
    pub fn for_test(&self, test: &TestDefinition) -> ScoringConfig {
        let test_max_score = match test.max_score {
            Some(max) if max.is_finite() && max > 0.0 => max,
            Some(max) => {
                tracing::warn!(test = %test.id, max, "ignoring non-positive max_score");
                self.test_max_score
            }
            None => self.test_max_score,
        };
        ScoringConfig {
            test_max_score,
            pass_threshold: test.pass_score.or(self.pass_threshold),
            rounding: self.rounding,
        }
    }
}

/// Top-level quizmark configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizmarkConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Where grading reports are written when no `--output` is given.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// Environment variable overrides: `QUIZMARK_TEST_MAX_SCORE`,
/// `QUIZMARK_PASS_THRESHOLD`, `QUIZMARK_ROUNDING`.
pub fn load_config() -> Result<QuizmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmarkConfig::default(),
    };

    apply_env_overrides(&mut config.scoring, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Parse a config TOML document.
pub fn parse_config_str(content: &str) -> Result<QuizmarkConfig> {
    let config: QuizmarkConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.scoring.test_max_score > 0.0,
        "scoring.test_max_score must be positive"
    );
    Ok(config)
}

fn apply_env_overrides(
    scoring: &mut ScoringConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(raw) = lookup("QUIZMARK_TEST_MAX_SCORE") {
        scoring.test_max_score = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZMARK_TEST_MAX_SCORE: '{raw}'"))?;
        anyhow::ensure!(
            scoring.test_max_score > 0.0,
            "QUIZMARK_TEST_MAX_SCORE must be positive"
        );
    }
    if let Some(raw) = lookup("QUIZMARK_PASS_THRESHOLD") {
        let threshold = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZMARK_PASS_THRESHOLD: '{raw}'"))?;
        scoring.pass_threshold = Some(threshold);
    }
    if let Some(raw) = lookup("QUIZMARK_ROUNDING") {
        scoring.rounding = raw.parse()?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}
