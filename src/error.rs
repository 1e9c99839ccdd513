//! API-facing error type shared by HTTP handlers and the WebSocket loop.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unknown session: {0}")]
  SessionNotFound(String),
  #[error(transparent)]
  Session(#[from] SessionError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Session(SessionError::UnexpectedQuestion { .. }) => StatusCode::BAD_REQUEST,
      ApiError::Session(SessionError::InvalidTransition { .. } | SessionError::NotComplete) => StatusCode::CONFLICT,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = Json(json!({ "error": self.to_string() }));
    (self.status(), body).into_response()
  }
}
