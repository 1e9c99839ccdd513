//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Creating and starting assessment sessions
//!   - Recording answers and reporting the next question
//!   - Serving final results, resets and restarts
//!   - Listing the public questions of one level

use tracing::{info, instrument};

use crate::domain::{AssessmentResult, Level};
use crate::error::ApiError;
use crate::protocol::{question_out, session_out, AnswerOut, QuestionOut, SessionOut};
use crate::session::{AnswerOutcome, SessionError};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn start_assessment(state: &AppState, level: Option<Level>, seed: Option<u64>) -> Result<SessionOut, ApiError> {
  let id = state.create_session(level, seed).await;
  state
    .with_session(&id, |s, engine| {
      s.start(engine)?;
      Ok(session_out(s, engine))
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn restart_assessment(state: &AppState, session_id: &str) -> Result<SessionOut, ApiError> {
  state
    .with_session(session_id, |s, engine| {
      s.start(engine)?;
      Ok(session_out(s, engine))
    })
    .await
}

#[instrument(level = "debug", skip(state), fields(%session_id))]
pub async fn session_snapshot(state: &AppState, session_id: &str) -> Result<SessionOut, ApiError> {
  state.with_session(session_id, |s, engine| Ok(session_out(s, engine))).await
}

#[instrument(level = "info", skip(state, selected), fields(%session_id, %question_id))]
pub async fn submit_answer(
  state: &AppState,
  session_id: &str,
  question_id: &str,
  selected: &str,
) -> Result<AnswerOut, ApiError> {
  state
    .with_session(session_id, |s, engine| {
      let outcome = s.submit_answer(engine, question_id, selected)?;
      let (accepted, correct, expected) = match outcome {
        AnswerOutcome::Recorded { correct, expected } => (true, correct, expected),
        AnswerOutcome::Ignored => (false, false, String::new()),
      };
      info!(target: "assessment", session = %session_id, %question_id, accepted, correct, phase = %s.phase(), "Answer evaluated");
      Ok(AnswerOut { accepted, correct, expected, session: session_out(s, engine) })
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn assessment_result(state: &AppState, session_id: &str) -> Result<AssessmentResult, ApiError> {
  state
    .with_session(session_id, |s, _| s.result().cloned().ok_or(ApiError::Session(SessionError::NotComplete)))
    .await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn reset_assessment(state: &AppState, session_id: &str) -> Result<SessionOut, ApiError> {
  state
    .with_session(session_id, |s, engine| {
      s.reset()?;
      Ok(session_out(s, engine))
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn discard_assessment(state: &AppState, session_id: &str) -> Result<(), ApiError> {
  state.remove_session(session_id).await
}

/// Public view of one level's questions. Unknown level strings give an empty list.
pub fn questions_for_level(state: &AppState, level: &str) -> Vec<QuestionOut> {
  state.engine.bank.questions_for_level_str(level).into_iter().map(question_out).collect()
}
