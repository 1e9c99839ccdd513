//! Loading assessment configuration (session settings, topic weights, extra questions) from TOML.
//!
//! Schema:
//!
//! ```toml
//! replace_builtin_bank = false
//!
//! [assessment]
//! min_questions = 8
//! max_questions = 12
//! confidence_threshold = 0.7
//! initial_level = "B1"
//! batch_size = 5
//! time_limit_secs = 900
//! session_idle_secs = 1800
//!
//! [topic_weights]
//! healthcare = 1.5
//!
//! [[questions]]
//! id = "cfg-b1-01"
//! text = "Der Patient klagt ___ Kopfschmerzen."
//! options = ["über", "auf", "an", "mit"]
//! correct_answer = "über"
//! difficulty = "B1"
//! topic = "grammar"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::bank::{BankError, QuestionSpec};
use crate::domain::Level;

pub const CONFIG_PATH_ENV: &str = "ASSESSMENT_CONFIG_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Io { path: String, source: std::io::Error },
  #[error("failed to parse config file {path}: {source}")]
  Parse { path: String, source: toml::de::Error },
  #[error("invalid assessment settings: {0}")]
  InvalidSettings(String),
  #[error("topic weight for '{topic}' must be a positive finite number, got {weight}")]
  InvalidTopicWeight { topic: String, weight: f64 },
  #[error("invalid question bank: {0}")]
  Bank(#[from] BankError),
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AssessmentConfig {
  #[serde(default)]
  pub assessment: AssessmentSettings,
  #[serde(default)]
  pub topic_weights: HashMap<String, f64>,
  #[serde(default)]
  pub replace_builtin_bank: bool,
  #[serde(default)]
  pub questions: Vec<QuestionSpec>,
}

/// Per-session knobs for selection and termination.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssessmentSettings {
  pub min_questions: usize,
  pub max_questions: usize,
  pub confidence_threshold: f64,
  pub initial_level: Level,
  /// Questions fetched per selector call.
  pub batch_size: usize,
  /// Optional wall-clock limit for one session.
  pub time_limit_secs: Option<u64>,
  /// Sessions untouched for this long are dropped from the store.
  pub session_idle_secs: u64,
}

impl Default for AssessmentSettings {
  fn default() -> Self {
    Self {
      min_questions: 8,
      max_questions: 12,
      confidence_threshold: 0.7,
      initial_level: Level::B1,
      batch_size: 5,
      time_limit_secs: None,
      session_idle_secs: 1800,
    }
  }
}

impl AssessmentSettings {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.min_questions == 0 {
      return Err(ConfigError::InvalidSettings("min_questions must be at least 1".into()));
    }
    if self.min_questions > self.max_questions {
      return Err(ConfigError::InvalidSettings(format!(
        "min_questions ({}) exceeds max_questions ({})",
        self.min_questions, self.max_questions
      )));
    }
    if !(0.0..=1.0).contains(&self.confidence_threshold) {
      return Err(ConfigError::InvalidSettings(format!(
        "confidence_threshold must lie in [0, 1], got {}",
        self.confidence_threshold
      )));
    }
    if self.batch_size == 0 {
      return Err(ConfigError::InvalidSettings("batch_size must be at least 1".into()));
    }
    if self.session_idle_secs == 0 {
      return Err(ConfigError::InvalidSettings("session_idle_secs must be at least 1".into()));
    }
    Ok(())
  }
}

pub fn parse_config(raw: &str, path: &str) -> Result<AssessmentConfig, ConfigError> {
  toml::from_str::<AssessmentConfig>(raw).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
}

pub fn load_config_file(path: &Path) -> Result<AssessmentConfig, ConfigError> {
  let shown = path.display().to_string();
  let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: shown.clone(), source })?;
  let cfg = parse_config(&raw, &shown)?;
  info!(target: "medideutsch_backend", path = %shown, questions = cfg.questions.len(), "Loaded assessment config (TOML)");
  Ok(cfg)
}

/// Load `AssessmentConfig` from ASSESSMENT_CONFIG_PATH. No variable means built-in defaults;
/// a set but unreadable or malformed file is an error.
pub fn load_config_from_env() -> Result<Option<AssessmentConfig>, ConfigError> {
  match std::env::var(CONFIG_PATH_ENV) {
    Ok(path) => load_config_file(Path::new(&path)).map(Some),
    Err(_) => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"
replace_builtin_bank = true

[assessment]
min_questions = 4
max_questions = 6
confidence_threshold = 0.8
initial_level = "A2"
time_limit_secs = 600

[topic_weights]
healthcare = 2.0
idioms = 0.5

[[questions]]
id = "cfg-1"
text = "Der Patient klagt ___ Kopfschmerzen."
options = ["über", "auf", "an"]
correct_answer = "über"
difficulty = "B1"
topic = "grammar"

[[questions]]
id = "cfg-2"
text = "Was bedeutet 'nüchtern' vor einer Blutabnahme?"
options = [
  { id = "a", text = "ohne vorher zu essen" },
  { id = "b", text = "ohne Alkohol" },
]
correct_answer = "a"
difficulty = "B2"
topic = "healthcare"
"#;

  #[test]
  fn parses_full_config() {
    let cfg = parse_config(SAMPLE, "inline").unwrap();
    assert!(cfg.replace_builtin_bank);
    assert_eq!(cfg.assessment.min_questions, 4);
    assert_eq!(cfg.assessment.max_questions, 6);
    assert_eq!(cfg.assessment.initial_level, Level::A2);
    assert_eq!(cfg.assessment.batch_size, 5, "unset keys keep defaults");
    assert_eq!(cfg.assessment.time_limit_secs, Some(600));
    assert_eq!(cfg.assessment.session_idle_secs, 1800);
    assert_eq!(cfg.topic_weights.get("healthcare"), Some(&2.0));
    assert_eq!(cfg.questions.len(), 2);

    let second = cfg.questions[1].clone().normalize().unwrap();
    assert_eq!(second.correct_answer, "a");
    assert_eq!(second.options[0].text, "ohne vorher zu essen");
  }

  #[test]
  fn empty_config_is_all_defaults() {
    let cfg = parse_config("", "inline").unwrap();
    assert_eq!(cfg.assessment, AssessmentSettings::default());
    assert!(cfg.questions.is_empty());
    assert!(!cfg.replace_builtin_bank);
  }

  #[test]
  fn unknown_difficulty_fails_to_parse() {
    let raw = r#"
[[questions]]
id = "x"
text = "?"
options = ["a", "b"]
correct_answer = "a"
difficulty = "D7"
topic = "grammar"
"#;
    assert!(matches!(parse_config(raw, "inline"), Err(ConfigError::Parse { .. })));
  }

  #[test]
  fn settings_validation() {
    assert!(AssessmentSettings::default().validate().is_ok());

    let inverted = AssessmentSettings { min_questions: 10, max_questions: 5, ..Default::default() };
    assert!(matches!(inverted.validate(), Err(ConfigError::InvalidSettings(_))));

    let threshold = AssessmentSettings { confidence_threshold: 1.5, ..Default::default() };
    assert!(threshold.validate().is_err());

    let batch = AssessmentSettings { batch_size: 0, ..Default::default() };
    assert!(batch.validate().is_err());

    let idle = AssessmentSettings { session_idle_secs: 0, ..Default::default() };
    assert!(idle.validate().is_err());
  }

  #[test]
  fn missing_file_is_an_io_error() {
    let err = load_config_file(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
  }
}
