//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(level = ?q.level))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionsQuery>,
) -> impl IntoResponse {
  let level = q.level.as_deref().unwrap_or_default();
  let questions = questions_for_level(&state, level);
  info!(target: "assessment", %level, count = questions.len(), "HTTP questions listed");
  Json(questions)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_assessment(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<(StatusCode, Json<SessionOut>), ApiError> {
  let out = start_assessment(&state, body.level, body.seed).await?;
  info!(target: "assessment", session = %out.session_id, level = %out.current_level, "HTTP assessment started");
  Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_assessment(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  session_snapshot(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_start(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  restart_assessment(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state, body), fields(%id, question_id = %body.question_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, ApiError> {
  submit_answer(&state, &id, &body.question_id, &body.selected_answer).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_result(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let result = assessment_result(&state, &id).await?;
  info!(target: "assessment", session = %id, level = %result.level, "HTTP result served");
  Ok(Json(result))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  reset_assessment(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_assessment(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  discard_assessment(&state, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}
