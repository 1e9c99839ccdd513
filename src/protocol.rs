//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Questions go out without their correct answer; it is revealed only in an answer reply.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{AssessmentResult, Level, Question, QuestionOption};
use crate::engine::AssessmentEngine;
use crate::session::{AssessmentSession, CompletionReason, SessionPhase};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartAssessment {
        #[serde(default, deserialize_with = "lenient_level")]
        level: Option<Level>,
        #[serde(default)]
        seed: Option<u64>,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "selectedAnswer")]
        selected_answer: String,
    },
    GetSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    GetResult {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Reset {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Restart {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session { session: SessionOut },
    AnswerResult { answer: AnswerOut },
    #[serde(rename = "result")]
    Final { result: AssessmentResult },
    Error { message: String },
}

/// Question as presented to the learner.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    pub text: String,
    pub options: Vec<QuestionOption>,
    pub difficulty: Level,
    pub topic: String,
}

pub fn question_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        text: q.text.clone(),
        options: q.options.clone(),
        difficulty: q.difficulty,
        topic: q.topic.clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub phase: SessionPhase,
    #[serde(rename = "currentLevel")]
    pub current_level: Level,
    pub answered: usize,
    pub correct: usize,
    pub question: Option<QuestionOut>,
    pub completion: Option<CompletionReason>,
    pub result: Option<AssessmentResult>,
}

/// Snapshot of a session for either transport.
pub fn session_out(s: &AssessmentSession, engine: &AssessmentEngine) -> SessionOut {
    SessionOut {
        session_id: s.id.clone(),
        phase: s.phase(),
        current_level: s.level(),
        answered: s.answers().len(),
        correct: s.correct_count(),
        question: s.current_question(engine).map(question_out),
        completion: s.completion(),
        result: s.result().cloned(),
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    /// False when the session was already complete and the answer was dropped.
    pub accepted: bool,
    pub correct: bool,
    pub expected: String,
    pub session: SessionOut,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Default, Deserialize)]
pub struct StartIn {
    #[serde(default, deserialize_with = "lenient_level")]
    pub level: Option<Level>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "selectedAnswer")]
    pub selected_answer: String,
}

/// `level` is free text; a missing or unknown level lists nothing.
#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    #[serde(default)]
    pub level: Option<String>,
}

/// Accepts level names in any case ("b1", " B1 ").
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => Level::parse(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown level: {raw}"))),
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_level_is_case_insensitive() {
        let body: StartIn = serde_json::from_str(r#"{"level":"b1"}"#).unwrap();
        assert_eq!(body.level, Some(Level::B1));

        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"start_assessment","level":" c1 "}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::StartAssessment { level: Some(Level::C1), .. }));
    }

    #[test]
    fn start_level_may_be_absent_or_null() {
        assert_eq!(serde_json::from_str::<StartIn>("{}").unwrap().level, None);
        assert_eq!(serde_json::from_str::<StartIn>(r#"{"level":null}"#).unwrap().level, None);
    }

    #[test]
    fn unknown_start_level_is_rejected() {
        let err = serde_json::from_str::<StartIn>(r#"{"level":"D7"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown level: D7"));
    }
}
