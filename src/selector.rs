//! Adaptive question selection.
//!
//! Greedy and stateless: each call looks only at the answers so far, nudges the target
//! level up or down by one rank, and samples unanswered questions around it. The random
//! source is always passed in, which keeps selection reproducible under a fixed seed.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::bank::QuestionBank;
use crate::domain::{Level, Question, UserAnswer};

/// Above this share of correct answers the target moves one rank up.
pub const PROMOTE_RATIO: f64 = 0.7;
/// Below this share of correct answers the target moves one rank down.
pub const DEMOTE_RATIO: f64 = 0.3;

/// Level the next batch should centre on, given the history so far.
pub fn target_level(current: Level, history: &[UserAnswer]) -> Level {
  if history.is_empty() {
    return current;
  }
  let correct = history.iter().filter(|a| a.is_correct).count();
  let ratio = correct as f64 / history.len() as f64;
  let rank = current.rank();

  let target = if ratio > PROMOTE_RATIO && rank < 6 {
    rank + 1
  } else if ratio < DEMOTE_RATIO && rank > 1 {
    rank - 1
  } else {
    rank
  };
  Level::from_rank(target).unwrap_or(current)
}

/// Sample up to `count` unanswered questions within one rank of `target`.
///
/// If the band holds fewer than `count` candidates, every other unanswered question is
/// added to the pool before shuffling. A short result only means the bank ran dry.
pub fn select_around<'a, R: Rng + ?Sized>(
  bank: &'a QuestionBank,
  target: Level,
  history: &[UserAnswer],
  count: usize,
  rng: &mut R,
) -> Vec<&'a Question> {
  let answered: HashSet<&str> = history.iter().map(|a| a.question_id.as_str()).collect();
  let target_rank = i16::from(target.rank());

  let mut pool: Vec<&Question> = bank
    .questions()
    .iter()
    .filter(|q| !answered.contains(q.id.as_str()))
    .filter(|q| (i16::from(q.difficulty.rank()) - target_rank).abs() <= 1)
    .collect();
  let band = pool.len();

  if pool.len() < count {
    let in_pool: HashSet<&str> = pool.iter().map(|q| q.id.as_str()).collect();
    let rest: Vec<&Question> = bank
      .questions()
      .iter()
      .filter(|q| !answered.contains(q.id.as_str()) && !in_pool.contains(q.id.as_str()))
      .collect();
    pool.extend(rest);
  }

  pool.shuffle(rng);
  pool.truncate(count);
  debug!(target: "assessment", target_level = %target, band, pool = pool.len(), count, "Selected question batch");
  pool
}

/// Pick the next batch: compute the target level from `history`, then sample around it.
#[instrument(level = "debug", skip(bank, history, rng), fields(answered = history.len()))]
pub fn select_adaptive_questions<'a, R: Rng + ?Sized>(
  bank: &'a QuestionBank,
  current_level: Level,
  history: &[UserAnswer],
  count: usize,
  rng: &mut R,
) -> Vec<&'a Question> {
  let target = target_level(current_level, history);
  select_around(bank, target, history, count, rng)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use crate::seeds::seed_questions;

  fn bank() -> QuestionBank {
    QuestionBank::new(seed_questions().unwrap()).unwrap()
  }

  fn answers(bank: &QuestionBank, level: Level, total: usize, correct: usize) -> Vec<UserAnswer> {
    bank
      .questions_for_level(level)
      .into_iter()
      .take(total)
      .enumerate()
      .map(|(i, q)| UserAnswer {
        question_id: q.id.clone(),
        selected_answer: q.correct_answer.clone(),
        is_correct: i < correct,
      })
      .collect()
  }

  fn ids(qs: &[&Question]) -> Vec<String> {
    qs.iter().map(|q| q.id.clone()).collect()
  }

  #[test]
  fn empty_history_keeps_level_and_stays_in_band() {
    let bank = bank();
    let mut rng = StdRng::seed_from_u64(1);
    let picked = select_adaptive_questions(&bank, Level::B1, &[], 10, &mut rng);
    assert_eq!(picked.len(), 10);
    assert!(picked.iter().all(|q| matches!(q.difficulty, Level::A2 | Level::B1 | Level::B2)));
    let unique: HashSet<_> = picked.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(unique.len(), 10);
  }

  #[test]
  fn strong_history_moves_target_up() {
    let bank = bank();
    let history = answers(&bank, Level::B1, 10, 9);
    assert_eq!(target_level(Level::B1, &history), Level::B2);
  }

  #[test]
  fn weak_history_moves_target_down() {
    let bank = bank();
    let history = answers(&bank, Level::B1, 10, 2);
    assert_eq!(target_level(Level::B1, &history), Level::A2);
  }

  #[test]
  fn middling_history_keeps_target() {
    let bank = bank();
    // 0.7 and 0.3 exactly are not strict enough to move.
    assert_eq!(target_level(Level::B1, &answers(&bank, Level::B1, 10, 7)), Level::B1);
    assert_eq!(target_level(Level::B1, &answers(&bank, Level::B1, 10, 3)), Level::B1);
  }

  #[test]
  fn target_is_clamped_at_the_ends() {
    let bank = bank();
    assert_eq!(target_level(Level::C2, &answers(&bank, Level::C2, 5, 5)), Level::C2);
    assert_eq!(target_level(Level::A1, &answers(&bank, Level::A1, 5, 0)), Level::A1);
  }

  #[test]
  fn same_seed_same_selection() {
    let bank = bank();
    let history = answers(&bank, Level::B1, 4, 2);
    let a = select_adaptive_questions(&bank, Level::B1, &history, 6, &mut StdRng::seed_from_u64(42));
    let b = select_adaptive_questions(&bank, Level::B1, &history, 6, &mut StdRng::seed_from_u64(42));
    assert_eq!(ids(&a), ids(&b));
  }

  #[test]
  fn never_returns_answered_questions() {
    let bank = bank();
    let history = answers(&bank, Level::B1, 12, 6);
    let answered: HashSet<&str> = history.iter().map(|a| a.question_id.as_str()).collect();
    for seed in 0..20 {
      let picked = select_adaptive_questions(&bank, Level::B1, &history, 12, &mut StdRng::seed_from_u64(seed));
      assert!(picked.iter().all(|q| !answered.contains(q.id.as_str())));
    }
  }

  #[test]
  fn small_band_is_extended_with_other_levels() {
    let bank = bank();
    // A1 band covers A1 and A2 only: 24 questions.
    let picked = select_around(&bank, Level::A1, &[], 30, &mut StdRng::seed_from_u64(3));
    assert_eq!(picked.len(), 30);
    assert!(picked.iter().any(|q| q.difficulty > Level::A2));
    let unique: HashSet<_> = picked.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(unique.len(), 30);
  }

  #[test]
  fn exhausted_bank_gives_short_result() {
    let bank = bank();
    let history: Vec<UserAnswer> = bank
      .questions()
      .iter()
      .skip(3)
      .map(|q| UserAnswer { question_id: q.id.clone(), selected_answer: String::new(), is_correct: false })
      .collect();
    let picked = select_around(&bank, Level::C2, &history, 10, &mut StdRng::seed_from_u64(9));
    assert_eq!(picked.len(), 3);

    let empty = QuestionBank::new(Vec::new()).unwrap();
    assert!(select_around(&empty, Level::B1, &[], 5, &mut StdRng::seed_from_u64(9)).is_empty());
  }
}
