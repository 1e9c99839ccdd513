//! The immutable assessment engine: bank, topic weights and session settings bundled once
//! at startup and handed to every session call.

use tracing::{info, warn};

use crate::bank::QuestionBank;
use crate::config::{AssessmentConfig, AssessmentSettings, ConfigError};
use crate::domain::{AssessmentResult, Level, UserAnswer};
use crate::scoring::{calculate_assessment_results, should_end_assessment, TopicWeights};
use crate::seeds::seed_questions;

#[derive(Debug)]
pub struct AssessmentEngine {
  pub bank: QuestionBank,
  pub weights: TopicWeights,
  pub settings: AssessmentSettings,
}

impl AssessmentEngine {
  pub fn new(bank: QuestionBank, weights: TopicWeights, settings: AssessmentSettings) -> Result<Self, ConfigError> {
    settings.validate()?;
    Ok(Self { bank, weights, settings })
  }

  /// Build from config: built-in seeds (unless replaced) followed by config questions.
  pub fn from_config(cfg: AssessmentConfig) -> Result<Self, ConfigError> {
    let mut questions = if cfg.replace_builtin_bank { Vec::new() } else { seed_questions()? };
    for spec in cfg.questions {
      questions.push(spec.normalize()?);
    }
    let bank = QuestionBank::new(questions)?;
    let weights = TopicWeights::with_overrides(&cfg.topic_weights)?;
    let engine = Self::new(bank, weights, cfg.assessment)?;
    engine.log_inventory();
    Ok(engine)
  }

  fn log_inventory(&self) {
    if self.bank.is_empty() {
      warn!(target: "assessment", "Question bank is empty; every session completes immediately");
      return;
    }
    for (level, count) in self.bank.count_by_level() {
      if count < self.settings.max_questions {
        warn!(target: "assessment", %level, count, max_questions = self.settings.max_questions, "Level has fewer questions than a full session");
      } else {
        info!(target: "assessment", %level, count, "Startup question inventory");
      }
    }
  }

  pub fn should_end(&self, answers: &[UserAnswer]) -> bool {
    should_end_assessment(
      answers,
      self.settings.max_questions,
      self.settings.min_questions,
      self.settings.confidence_threshold,
    )
  }

  pub fn results(&self, answers: &[UserAnswer]) -> AssessmentResult {
    calculate_assessment_results(answers, &self.bank, &self.weights)
  }

  pub fn initial_level(&self) -> Level {
    self.settings.initial_level
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::parse_config;

  #[test]
  fn default_config_uses_seed_bank() {
    let engine = AssessmentEngine::from_config(AssessmentConfig::default()).unwrap();
    assert_eq!(engine.bank.len(), seed_questions().unwrap().len());
    assert_eq!(engine.initial_level(), Level::B1);
  }

  #[test]
  fn config_questions_extend_or_replace_the_bank() {
    let raw = r#"
[[questions]]
id = "cfg-1"
text = "Die Wunde muss ___ werden."
options = ["desinfiziert", "desinfizieren", "desinfiziere"]
correct_answer = "desinfiziert"
difficulty = "B2"
topic = "healthcare"
"#;
    let extended = AssessmentEngine::from_config(parse_config(raw, "inline").unwrap()).unwrap();
    assert_eq!(extended.bank.len(), seed_questions().unwrap().len() + 1);
    assert!(extended.bank.get("cfg-1").is_some());

    let replaced_raw = format!("replace_builtin_bank = true\n{raw}");
    let replaced = AssessmentEngine::from_config(parse_config(&replaced_raw, "inline").unwrap()).unwrap();
    assert_eq!(replaced.bank.len(), 1);
  }

  #[test]
  fn duplicate_config_id_refuses_to_start() {
    let raw = r#"
[[questions]]
id = "a1-01"
text = "Duplikat"
options = ["x", "y"]
correct_answer = "x"
difficulty = "A1"
topic = "grammar"
"#;
    let err = AssessmentEngine::from_config(parse_config(raw, "inline").unwrap()).unwrap_err();
    assert!(matches!(err, ConfigError::Bank(_)));
  }

  #[test]
  fn bad_correct_answer_refuses_to_start() {
    let raw = r#"
[[questions]]
id = "cfg-bad"
text = "Was fehlt?"
options = ["x", "y"]
correct_answer = "z"
difficulty = "A1"
topic = "grammar"
"#;
    assert!(AssessmentEngine::from_config(parse_config(raw, "inline").unwrap()).is_err());
  }

  #[test]
  fn invalid_settings_refuse_to_start() {
    let raw = "[assessment]\nmin_questions = 20\nmax_questions = 10\n";
    let err = AssessmentEngine::from_config(parse_config(raw, "inline").unwrap()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSettings(_)));
  }
}
