//! Weighted scoring, CEFR estimation and the early-termination rule.

use std::collections::HashMap;

use crate::bank::QuestionBank;
use crate::config::ConfigError;
use crate::domain::{AssessmentResult, Level, Question, UserAnswer};

/// Performance at or beyond these shares of correct answers ends a session at `min_questions`.
pub const DECISIVE_HIGH: f64 = 0.85;
pub const DECISIVE_LOW: f64 = 0.15;

/// Lower score bounds, checked top-down.
const LEVEL_THRESHOLDS: [(f64, Level); 5] = [
  (0.90, Level::C2),
  (0.75, Level::C1),
  (0.60, Level::B2),
  (0.45, Level::B1),
  (0.30, Level::A2),
];

/// Relative importance of each topic. Unknown topics weigh 1.0.
#[derive(Clone, Debug)]
pub struct TopicWeights {
  weights: HashMap<String, f64>,
}

impl Default for TopicWeights {
  fn default() -> Self {
    let weights = [
      ("healthcare", 1.5),
      ("medical_terminology", 1.3),
      ("communication", 1.2),
      ("grammar", 1.0),
      ("vocabulary", 1.0),
      ("idioms", 0.8),
    ]
    .into_iter()
    .map(|(t, w)| (t.to_string(), w))
    .collect();
    Self { weights }
  }
}

impl TopicWeights {
  pub const DEFAULT_WEIGHT: f64 = 1.0;

  /// Built-in weights with `overrides` applied on top. Every weight must be positive and finite.
  pub fn with_overrides(overrides: &HashMap<String, f64>) -> Result<Self, ConfigError> {
    let mut out = Self::default();
    for (topic, &weight) in overrides {
      if !weight.is_finite() || weight <= 0.0 {
        return Err(ConfigError::InvalidTopicWeight { topic: topic.clone(), weight });
      }
      out.weights.insert(topic.clone(), weight);
    }
    Ok(out)
  }

  /// Plain 1.0 for every topic.
  #[cfg(test)]
  pub fn uniform() -> Self {
    Self { weights: HashMap::new() }
  }

  pub fn weight(&self, topic: &str) -> f64 {
    self.weights.get(topic).copied().unwrap_or(Self::DEFAULT_WEIGHT)
  }

  /// Contribution of one answered question: difficulty rank times topic weight.
  pub fn question_weight(&self, q: &Question) -> f64 {
    f64::from(q.difficulty.rank()) * self.weight(&q.topic)
  }
}

/// Weighted share of correct answers in `[0, 1]`; 0 when nothing has been answered.
/// Answers pointing at unknown question ids are ignored.
pub fn calculate_weighted_score(answers: &[UserAnswer], bank: &QuestionBank, weights: &TopicWeights) -> f64 {
  let mut weighted_correct = 0.0;
  let mut total_possible = 0.0;
  for answer in answers {
    let Some(q) = bank.get(&answer.question_id) else { continue };
    let w = weights.question_weight(q);
    total_possible += w;
    if answer.is_correct {
      weighted_correct += w;
    }
  }
  if total_possible > 0.0 {
    weighted_correct / total_possible
  } else {
    0.0
  }
}

pub fn level_for_score(score: f64) -> Level {
  LEVEL_THRESHOLDS
    .iter()
    .find(|(min, _)| score >= *min)
    .map(|&(_, level)| level)
    .unwrap_or(Level::A1)
}

pub fn estimate_difficulty_level(answers: &[UserAnswer], bank: &QuestionBank, weights: &TopicWeights) -> Level {
  level_for_score(calculate_weighted_score(answers, bank, weights))
}

/// Triangular "decisiveness" proxy `1 - 2·|0.5 - p|` for `p = correct / total`.
///
/// Evaluated as `(total - |total - 2·correct|) / total`, which is the same value but keeps
/// exact boundaries (e.g. 13 of 20 against 0.7) exact in floating point.
pub fn confidence(correct: usize, total: usize) -> f64 {
  if total == 0 {
    return 0.0;
  }
  let spread = total.abs_diff(2 * correct);
  total.saturating_sub(spread) as f64 / total as f64
}

/// Decide whether a session has seen enough answers.
pub fn should_end_assessment(
  answers: &[UserAnswer],
  max_questions: usize,
  min_questions: usize,
  confidence_threshold: f64,
) -> bool {
  let total = answers.len();
  if total < min_questions {
    return false;
  }
  if total >= max_questions {
    return true;
  }
  // min_questions may be 0 when called directly.
  if total == 0 {
    return false;
  }
  let correct = answers.iter().filter(|a| a.is_correct).count();
  let correct_pct = correct as f64 / total as f64;
  if correct_pct >= DECISIVE_HIGH || correct_pct <= DECISIVE_LOW {
    return true;
  }
  confidence(correct, total) >= confidence_threshold
}

pub fn calculate_assessment_results(
  answers: &[UserAnswer],
  bank: &QuestionBank,
  weights: &TopicWeights,
) -> AssessmentResult {
  let total_questions = answers.len();
  let correct_count = answers.iter().filter(|a| a.is_correct).count();
  let percentage = if total_questions == 0 {
    0.0
  } else {
    correct_count as f64 / total_questions as f64 * 100.0
  };
  let level = estimate_difficulty_level(answers, bank, weights);
  AssessmentResult {
    level,
    correct_count,
    total_questions,
    percentage,
    description: level.description().to_string(),
  }
}
