//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::ApiError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "medideutsch_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "medideutsch_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "medideutsch_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "medideutsch_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "medideutsch_backend", "WebSocket disconnected");
}

fn error_reply(e: ApiError) -> ServerWsMessage {
  ServerWsMessage::Error { message: e.to_string() }
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartAssessment { level, seed } => match start_assessment(state, level, seed).await {
      Ok(session) => {
        info!(target: "assessment", session = %session.session_id, "WS assessment started");
        ServerWsMessage::Session { session }
      }
      Err(e) => error_reply(e),
    },

    ClientWsMessage::SubmitAnswer { session_id, question_id, selected_answer } => {
      match submit_answer(state, &session_id, &question_id, &selected_answer).await {
        Ok(answer) => ServerWsMessage::AnswerResult { answer },
        Err(e) => error_reply(e),
      }
    }

    ClientWsMessage::GetSession { session_id } => match session_snapshot(state, &session_id).await {
      Ok(session) => ServerWsMessage::Session { session },
      Err(e) => error_reply(e),
    },

    ClientWsMessage::GetResult { session_id } => match assessment_result(state, &session_id).await {
      Ok(result) => ServerWsMessage::Final { result },
      Err(e) => error_reply(e),
    },

    ClientWsMessage::Reset { session_id } => match reset_assessment(state, &session_id).await {
      Ok(session) => ServerWsMessage::Session { session },
      Err(e) => error_reply(e),
    },

    ClientWsMessage::Restart { session_id } => match restart_assessment(state, &session_id).await {
      Ok(session) => ServerWsMessage::Session { session },
      Err(e) => error_reply(e),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AssessmentConfig;

  fn state() -> AppState {
    AppState::from_config(AssessmentConfig::default()).unwrap()
  }

  async fn send(state: &AppState, raw: &str) -> serde_json::Value {
    let msg: ClientWsMessage = serde_json::from_str(raw).expect("valid client message");
    serde_json::to_value(handle_client_ws(msg, state).await).unwrap()
  }

  #[tokio::test]
  async fn ping_pong() {
    let state = state();
    assert_eq!(send(&state, r#"{"type":"ping"}"#).await["type"], "pong");
  }

  #[tokio::test]
  async fn start_and_answer_over_ws_messages() {
    let state = state();
    let started = send(&state, r#"{"type":"start_assessment","level":"A2","seed":3}"#).await;
    assert_eq!(started["type"], "session");
    assert_eq!(started["session"]["currentLevel"], "A2");
    let sid = started["session"]["sessionId"].as_str().unwrap().to_string();
    let qid = started["session"]["question"]["id"].as_str().unwrap().to_string();

    let raw = serde_json::json!({
      "type": "submit_answer",
      "sessionId": sid,
      "questionId": qid,
      "selectedAnswer": "definitely wrong",
    })
    .to_string();
    let reply = send(&state, &raw).await;
    assert_eq!(reply["type"], "answer_result");
    assert_eq!(reply["answer"]["accepted"], true);
    assert_eq!(reply["answer"]["correct"], false);

    let result = send(&state, &format!(r#"{{"type":"get_result","sessionId":"{sid}"}}"#)).await;
    assert_eq!(result["type"], "error");
  }

  #[tokio::test]
  async fn unknown_session_yields_error_message() {
    let state = state();
    let reply = send(&state, r#"{"type":"get_session","sessionId":"ghost"}"#).await;
    assert_eq!(reply["type"], "error");
    assert!(reply["message"].as_str().unwrap().contains("ghost"));
  }
}
