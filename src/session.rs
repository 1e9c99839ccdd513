//! One assessment session: NotStarted -> InProgress -> Complete -> (reset) -> NotStarted.
//!
//! The session owns its answer history, a queue of questions already chosen but not yet
//! answered, its own RNG, and the working level that steers the selector. Questions are
//! referenced by id and resolved against the engine's bank on demand.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{AssessmentResult, Level, Question, UserAnswer};
use crate::engine::AssessmentEngine;
use crate::selector::{select_adaptive_questions, target_level};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
  NotStarted,
  InProgress,
  Complete,
}

impl fmt::Display for SessionPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SessionPhase::NotStarted => "not_started",
      SessionPhase::InProgress => "in_progress",
      SessionPhase::Complete => "complete",
    })
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("cannot {action} while the session is {phase}")]
  InvalidTransition { phase: SessionPhase, action: &'static str },
  #[error("expected an answer to question '{expected}', got '{got}'")]
  UnexpectedQuestion { expected: String, got: String },
  #[error("assessment is not complete yet")]
  NotComplete,
}

/// Why a session reached Complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
  Terminated,
  PoolExhausted,
  TimeLimit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
  Recorded { correct: bool, expected: String },
  /// Answer arrived after completion and was dropped.
  Ignored,
}

#[derive(Debug)]
pub struct AssessmentSession {
  pub id: String,
  phase: SessionPhase,
  initial_level: Level,
  level: Level,
  answers: Vec<UserAnswer>,
  pending: VecDeque<String>,
  rng: StdRng,
  started_at: Option<Instant>,
  result: Option<AssessmentResult>,
  completion: Option<CompletionReason>,
  last_active: Instant,
}

impl AssessmentSession {
  pub fn new(id: String, level: Level, rng: StdRng) -> Self {
    Self {
      id,
      phase: SessionPhase::NotStarted,
      initial_level: level,
      level,
      answers: Vec::new(),
      pending: VecDeque::new(),
      rng,
      started_at: None,
      result: None,
      completion: None,
      last_active: Instant::now(),
    }
  }

  /// Mark the session as used at `now`.
  pub fn touch(&mut self, now: Instant) {
    self.last_active = now;
  }

  pub fn idle_for(&self, now: Instant) -> Duration {
    now.saturating_duration_since(self.last_active)
  }

  pub fn phase(&self) -> SessionPhase {
    self.phase
  }

  /// Working level used for the next selection.
  pub fn level(&self) -> Level {
    self.level
  }

  pub fn answers(&self) -> &[UserAnswer] {
    &self.answers
  }

  pub fn correct_count(&self) -> usize {
    self.answers.iter().filter(|a| a.is_correct).count()
  }

  pub fn result(&self) -> Option<&AssessmentResult> {
    self.result.as_ref()
  }

  pub fn completion(&self) -> Option<CompletionReason> {
    self.completion
  }

  pub fn current_question<'a>(&self, engine: &'a AssessmentEngine) -> Option<&'a Question> {
    if self.phase != SessionPhase::InProgress {
      return None;
    }
    self.pending.front().and_then(|id| engine.bank.get(id))
  }

  pub fn start(&mut self, engine: &AssessmentEngine) -> Result<(), SessionError> {
    if self.phase != SessionPhase::NotStarted {
      return Err(SessionError::InvalidTransition { phase: self.phase, action: "start" });
    }
    self.phase = SessionPhase::InProgress;
    self.started_at = Some(Instant::now());
    info!(target: "assessment", session = %self.id, level = %self.level, "Assessment started");
    if !self.refill(engine) {
      self.complete(engine, CompletionReason::PoolExhausted);
    }
    Ok(())
  }

  pub fn submit_answer(
    &mut self,
    engine: &AssessmentEngine,
    question_id: &str,
    selected: &str,
  ) -> Result<AnswerOutcome, SessionError> {
    match self.phase {
      SessionPhase::Complete => {
        debug!(target: "assessment", session = %self.id, %question_id, "Answer after completion ignored");
        return Ok(AnswerOutcome::Ignored);
      }
      SessionPhase::NotStarted => {
        return Err(SessionError::InvalidTransition { phase: self.phase, action: "answer" });
      }
      SessionPhase::InProgress => {}
    }

    let expected_id = self.pending.front().cloned().unwrap_or_default();
    if expected_id != question_id {
      return Err(SessionError::UnexpectedQuestion { expected: expected_id, got: question_id.to_string() });
    }
    let Some(question) = engine.bank.get(question_id) else {
      return Err(SessionError::UnexpectedQuestion { expected: expected_id, got: question_id.to_string() });
    };
    self.pending.pop_front();

    let correct = question.is_correct(selected);
    let expected = question.correct_answer.clone();
    self.answers.push(UserAnswer {
      question_id: question_id.to_string(),
      selected_answer: selected.to_string(),
      is_correct: correct,
    });
    debug!(target: "assessment", session = %self.id, %question_id, correct, answered = self.answers.len(), "Answer recorded");

    if self.time_expired(engine) {
      self.complete(engine, CompletionReason::TimeLimit);
    } else if engine.should_end(&self.answers) {
      self.complete(engine, CompletionReason::Terminated);
    } else if self.pending.is_empty() && !self.refill(engine) {
      self.complete(engine, CompletionReason::PoolExhausted);
    }

    Ok(AnswerOutcome::Recorded { correct, expected })
  }

  /// Complete -> NotStarted. Keeps the id and RNG, drops everything else.
  pub fn reset(&mut self) -> Result<(), SessionError> {
    if self.phase != SessionPhase::Complete {
      return Err(SessionError::InvalidTransition { phase: self.phase, action: "reset" });
    }
    self.phase = SessionPhase::NotStarted;
    self.level = self.initial_level;
    self.answers.clear();
    self.pending.clear();
    self.started_at = None;
    self.result = None;
    self.completion = None;
    info!(target: "assessment", session = %self.id, "Assessment reset");
    Ok(())
  }

  fn time_expired(&self, engine: &AssessmentEngine) -> bool {
    match (engine.settings.time_limit_secs, self.started_at) {
      (Some(limit), Some(started)) => started.elapsed() >= Duration::from_secs(limit),
      _ => false,
    }
  }

  /// Queue the next batch around the updated target level. False when nothing is left.
  fn refill(&mut self, engine: &AssessmentEngine) -> bool {
    let batch =
      select_adaptive_questions(&engine.bank, self.level, &self.answers, engine.settings.batch_size, &mut self.rng);
    self.level = target_level(self.level, &self.answers);
    self.pending.extend(batch.into_iter().map(|q| q.id.clone()));
    !self.pending.is_empty()
  }

  fn complete(&mut self, engine: &AssessmentEngine, reason: CompletionReason) {
    let result = engine.results(&self.answers);
    info!(
      target: "assessment",
      session = %self.id,
      ?reason,
      level = %result.level,
      correct = result.correct_count,
      total = result.total_questions,
      "Assessment complete"
    );
    self.pending.clear();
    self.phase = SessionPhase::Complete;
    self.completion = Some(reason);
    self.result = Some(result);
  }
}
