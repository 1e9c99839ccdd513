//! Question bank: the validated, immutable catalog of leveled questions.
//!
//! Questions arrive either from the built-in seeds or from the TOML config. Both go
//! through `QuestionSpec::normalize`, so options always end up as `{id, text}` pairs and
//! `correct_answer` always names an option id.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Level, Question, QuestionOption};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
  #[error("question has an empty id")]
  EmptyId,
  #[error("duplicate question id '{0}'")]
  DuplicateId(String),
  #[error("question '{0}' has empty text")]
  EmptyText(String),
  #[error("question '{id}' has {count} options (expected 2..=6)")]
  OptionCount { id: String, count: usize },
  #[error("question '{id}' repeats option id '{option}'")]
  DuplicateOption { id: String, option: String },
  #[error("question '{id}': correct answer '{answer}' does not match exactly one option")]
  CorrectAnswerMissing { id: String, answer: String },
}

/// Option as authored: a bare string or an `{ id, text }` table.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
  Text(String),
  Keyed { id: String, text: String },
}

impl OptionSpec {
  fn into_option(self) -> QuestionOption {
    match self {
      OptionSpec::Text(text) => QuestionOption { id: text.clone(), text },
      OptionSpec::Keyed { id, text } => QuestionOption { id, text },
    }
  }
}

/// Question entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionSpec {
  pub id: String,
  pub text: String,
  pub options: Vec<OptionSpec>,
  pub correct_answer: String,
  pub difficulty: Level,
  pub topic: String,
}

impl QuestionSpec {
  /// Collapse option shapes and resolve `correct_answer` to an option id.
  /// An answer matching no id may still match exactly one option text.
  pub fn normalize(self) -> Result<Question, BankError> {
    let options: Vec<QuestionOption> = self.options.into_iter().map(OptionSpec::into_option).collect();

    let correct_answer = if options.iter().any(|o| o.id == self.correct_answer) {
      self.correct_answer
    } else {
      let mut by_text = options.iter().filter(|o| o.text == self.correct_answer);
      match (by_text.next(), by_text.next()) {
        (Some(o), None) => o.id.clone(),
        _ => {
          return Err(BankError::CorrectAnswerMissing { id: self.id, answer: self.correct_answer });
        }
      }
    };

    Ok(Question {
      id: self.id,
      text: self.text,
      options,
      correct_answer,
      difficulty: self.difficulty,
      topic: self.topic,
    })
  }
}

fn validate(q: &Question) -> Result<(), BankError> {
  if q.id.trim().is_empty() {
    return Err(BankError::EmptyId);
  }
  if q.text.trim().is_empty() {
    return Err(BankError::EmptyText(q.id.clone()));
  }
  if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&q.options.len()) {
    return Err(BankError::OptionCount { id: q.id.clone(), count: q.options.len() });
  }
  let mut seen = HashSet::new();
  for o in &q.options {
    if !seen.insert(o.id.as_str()) {
      return Err(BankError::DuplicateOption { id: q.id.clone(), option: o.id.clone() });
    }
  }
  if !seen.contains(q.correct_answer.as_str()) {
    return Err(BankError::CorrectAnswerMissing { id: q.id.clone(), answer: q.correct_answer.clone() });
  }
  Ok(())
}

#[derive(Debug, Default)]
pub struct QuestionBank {
  questions: Vec<Question>,
  by_id: HashMap<String, usize>,
}

impl QuestionBank {
  /// Validate every question and index the catalog. The first defect aborts construction.
  pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
    let mut by_id = HashMap::with_capacity(questions.len());
    for (idx, q) in questions.iter().enumerate() {
      validate(q)?;
      if by_id.insert(q.id.clone(), idx).is_some() {
        return Err(BankError::DuplicateId(q.id.clone()));
      }
    }
    Ok(Self { questions, by_id })
  }

  /// All questions in catalog order.
  pub fn questions(&self) -> &[Question] {
    &self.questions
  }

  pub fn get(&self, id: &str) -> Option<&Question> {
    self.by_id.get(id).map(|&idx| &self.questions[idx])
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.questions.is_empty()
  }

  pub fn questions_for_level(&self, level: Level) -> Vec<&Question> {
    self.questions.iter().filter(|q| q.difficulty == level).collect()
  }

  /// Like `questions_for_level`, but for raw input; unknown levels give an empty list.
  pub fn questions_for_level_str(&self, level: &str) -> Vec<&Question> {
    Level::parse(level).map(|l| self.questions_for_level(l)).unwrap_or_default()
  }

  pub fn count_by_level(&self) -> Vec<(Level, usize)> {
    Level::ALL
      .into_iter()
      .map(|l| (l, self.questions.iter().filter(|q| q.difficulty == l).count()))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AssessmentSettings;
  use crate::seeds::seed_questions;

  fn spec(id: &str, options: Vec<OptionSpec>, correct: &str) -> QuestionSpec {
    QuestionSpec {
      id: id.into(),
      text: "Was passt?".into(),
      options,
      correct_answer: correct.into(),
      difficulty: Level::B1,
      topic: "grammar".into(),
    }
  }

  fn text(s: &str) -> OptionSpec {
    OptionSpec::Text(s.into())
  }

  #[test]
  fn builtin_catalog_is_valid_and_covers_every_level() {
    let bank = QuestionBank::new(seed_questions().unwrap()).expect("seed bank must validate");
    let max = AssessmentSettings::default().max_questions;
    for (level, count) in bank.count_by_level() {
      assert!(count >= max, "level {level} has {count} questions, needs at least {max}");
    }
  }

  #[test]
  fn questions_for_level_keeps_catalog_order() {
    let bank = QuestionBank::new(seed_questions().unwrap()).unwrap();
    let b2 = bank.questions_for_level(Level::B2);
    let expected: Vec<&str> = bank
      .questions()
      .iter()
      .filter(|q| q.difficulty == Level::B2)
      .map(|q| q.id.as_str())
      .collect();
    let got: Vec<&str> = b2.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(got, expected);
    assert!(b2.iter().all(|q| q.difficulty == Level::B2));
  }

  #[test]
  fn unknown_level_string_yields_empty() {
    let bank = QuestionBank::new(seed_questions().unwrap()).unwrap();
    assert!(bank.questions_for_level_str("Z9").is_empty());
    assert_eq!(bank.questions_for_level_str("a1").len(), bank.questions_for_level(Level::A1).len());
  }

  #[test]
  fn plain_string_options_use_text_as_id() {
    let q = spec("q1", vec![text("der"), text("die"), text("das")], "die").normalize().unwrap();
    assert_eq!(q.options[1], QuestionOption { id: "die".into(), text: "die".into() });
    assert_eq!(q.correct_answer, "die");
  }

  #[test]
  fn correct_answer_may_name_option_text() {
    let options = vec![
      OptionSpec::Keyed { id: "a".into(), text: "Blutdruck".into() },
      OptionSpec::Keyed { id: "b".into(), text: "Puls".into() },
    ];
    let q = spec("q2", options, "Puls").normalize().unwrap();
    assert_eq!(q.correct_answer, "b");
  }

  #[test]
  fn ambiguous_or_missing_correct_answer_is_rejected() {
    let err = spec("q3", vec![text("ja"), text("nein")], "vielleicht").normalize().unwrap_err();
    assert_eq!(err, BankError::CorrectAnswerMissing { id: "q3".into(), answer: "vielleicht".into() });

    let options = vec![
      OptionSpec::Keyed { id: "a".into(), text: "gleich".into() },
      OptionSpec::Keyed { id: "b".into(), text: "gleich".into() },
    ];
    assert!(spec("q4", options, "gleich").normalize().is_err());
  }

  #[test]
  fn bank_rejects_malformed_questions() {
    let one_option = spec("q5", vec![text("nur")], "nur").normalize().unwrap();
    assert_eq!(
      QuestionBank::new(vec![one_option]).unwrap_err(),
      BankError::OptionCount { id: "q5".into(), count: 1 }
    );

    let a = spec("dup", vec![text("x"), text("y")], "x").normalize().unwrap();
    let b = spec("dup", vec![text("x"), text("y")], "y").normalize().unwrap();
    assert_eq!(QuestionBank::new(vec![a, b]).unwrap_err(), BankError::DuplicateId("dup".into()));

    let mut broken = spec("q6", vec![text("x"), text("y")], "x").normalize().unwrap();
    broken.correct_answer = "z".into();
    assert!(matches!(QuestionBank::new(vec![broken]), Err(BankError::CorrectAnswerMissing { .. })));

    let repeated = spec("q7", vec![text("x"), text("x")], "x").normalize().unwrap();
    assert!(matches!(QuestionBank::new(vec![repeated]), Err(BankError::DuplicateOption { .. })));
  }

  #[test]
  fn lookup_by_id() {
    let bank = QuestionBank::new(seed_questions().unwrap()).unwrap();
    let first = &bank.questions()[0];
    assert_eq!(bank.get(&first.id).map(|q| q.id.as_str()), Some(first.id.as_str()));
    assert!(bank.get("does-not-exist").is_none());
    assert!(QuestionBank::new(Vec::new()).unwrap().is_empty());
  }
}
