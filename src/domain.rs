//! Domain models used by the assessment engine: CEFR levels, questions, answers and results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six CEFR proficiency tiers, ordered from beginner to mastery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
  A1,
  A2,
  B1,
  B2,
  C1,
  C2,
}

impl Level {
  pub const ALL: [Level; 6] = [Level::A1, Level::A2, Level::B1, Level::B2, Level::C1, Level::C2];

  /// Integer rank 1..=6 (`A1 = 1`, `C2 = 6`).
  pub fn rank(self) -> u8 {
    match self {
      Level::A1 => 1,
      Level::A2 => 2,
      Level::B1 => 3,
      Level::B2 => 4,
      Level::C1 => 5,
      Level::C2 => 6,
    }
  }

  pub fn from_rank(rank: u8) -> Option<Level> {
    Level::ALL.get(usize::from(rank).checked_sub(1)?).copied()
  }

  /// Lenient parse for user-facing input ("b1", " C2 "). Unknown strings yield `None`.
  pub fn parse(s: &str) -> Option<Level> {
    let s = s.trim();
    Level::ALL.into_iter().find(|l| l.as_str().eq_ignore_ascii_case(s))
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Level::A1 => "A1",
      Level::A2 => "A2",
      Level::B1 => "B1",
      Level::B2 => "B2",
      Level::C1 => "C1",
      Level::C2 => "C2",
    }
  }

  /// Static explanation shown with a final result.
  pub fn description(self) -> &'static str {
    match self {
      Level::A1 => "Beginner: you understand familiar everyday expressions and very basic phrases, such as greeting a patient or asking for their name.",
      Level::A2 => "Elementary: you handle simple, routine exchanges on the ward, such as asking about pain location or explaining where to wait.",
      Level::B1 => "Intermediate: you can take a basic patient history, follow the main points of handovers and describe symptoms in connected sentences.",
      Level::B2 => "Upper intermediate: you discuss diagnoses and treatment plans with colleagues and patients with a degree of fluency and spontaneity.",
      Level::C1 => "Advanced: you write discharge letters, lead informed-consent conversations and use medical terminology flexibly and precisely.",
      Level::C2 => "Mastery: you communicate effortlessly in every clinical situation, including nuanced, idiomatic and highly technical discussions.",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One selectable answer. Display order is the order inside `Question::options`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
  pub id: String,
  pub text: String,
}

/// Immutable multiple-choice question. `correct_answer` holds the id of one option.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub text: String,
  pub options: Vec<QuestionOption>,
  pub correct_answer: String,
  pub difficulty: Level,
  pub topic: String,
}

impl Question {
  pub fn is_correct(&self, selected: &str) -> bool {
    self.correct_answer == selected
  }
}

/// One answered question inside a session. Refers to the question by id only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
  pub question_id: String,
  pub selected_answer: String,
  pub is_correct: bool,
}

/// Final outcome of a completed session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
  pub level: Level,
  pub correct_count: usize,
  pub total_questions: usize,
  pub percentage: f64,
  pub description: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ranks_round_trip_through_levels() {
    for (i, level) in Level::ALL.into_iter().enumerate() {
      assert_eq!(level.rank() as usize, i + 1);
      assert_eq!(Level::from_rank(level.rank()), Some(level));
    }
    assert_eq!(Level::from_rank(0), None);
    assert_eq!(Level::from_rank(7), None);
  }

  #[test]
  fn levels_are_ordered() {
    assert!(Level::A1 < Level::A2);
    assert!(Level::B2 < Level::C1);
    assert_eq!(Level::ALL.iter().max(), Some(&Level::C2));
  }

  #[test]
  fn parse_is_lenient_but_rejects_unknown() {
    assert_eq!(Level::parse("b1"), Some(Level::B1));
    assert_eq!(Level::parse(" C2 "), Some(Level::C2));
    assert_eq!(Level::parse("D1"), None);
    assert_eq!(Level::parse(""), None);
  }

  #[test]
  fn exact_match_decides_correctness() {
    let q = Question {
      id: "q".into(),
      text: "Wie heißt das?".into(),
      options: vec![
        QuestionOption { id: "a".into(), text: "Herz".into() },
        QuestionOption { id: "b".into(), text: "Lunge".into() },
      ],
      correct_answer: "a".into(),
      difficulty: Level::A1,
      topic: "vocabulary".into(),
    };
    assert!(q.is_correct("a"));
    assert!(!q.is_correct("A"));
    assert!(!q.is_correct("Herz"));
  }
}
