//! Application state: the shared assessment engine and the in-memory session store.
//!
//! The engine is immutable after startup and shared through an `Arc`. Sessions live in a
//! map behind a tokio `RwLock`; engine calls are synchronous, so no guard is held across an
//! await point.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_config_from_env, AssessmentConfig, ConfigError};
use crate::domain::Level;
use crate::engine::AssessmentEngine;
use crate::error::ApiError;
use crate::session::AssessmentSession;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AssessmentEngine>,
    pub sessions: Arc<RwLock<HashMap<String, AssessmentSession>>>,
}

impl AppState {
    /// Build state from env: load optional TOML config, validate the bank, build the engine.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = match load_config_from_env()? {
            Some(cfg) => cfg,
            None => {
                info!(target: "medideutsch_backend", "No ASSESSMENT_CONFIG_PATH set. Using built-in bank and defaults.");
                AssessmentConfig::default()
            }
        };
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: AssessmentConfig) -> Result<Self, ConfigError> {
        let engine = AssessmentEngine::from_config(cfg)?;
        info!(
            target: "medideutsch_backend",
            questions = engine.bank.len(),
            min_questions = engine.settings.min_questions,
            max_questions = engine.settings.max_questions,
            confidence_threshold = engine.settings.confidence_threshold,
            "Assessment engine ready"
        );
        Ok(Self {
            engine: Arc::new(engine),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Register a new NotStarted session. A `seed` makes its question order reproducible.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self, level: Option<Level>, seed: Option<u64>) -> String {
        let id = Uuid::new_v4().to_string();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let level = level.unwrap_or_else(|| self.engine.initial_level());
        let session = AssessmentSession::new(id.clone(), level, rng);
        self.sessions.write().await.insert(id.clone(), session);
        info!(target: "assessment", session = %id, %level, seeded = seed.is_some(), "Session created");
        id
    }

    /// Run `f` against one session under the write lock.
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut AssessmentSession, &AssessmentEngine) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
        session.touch(Instant::now());
        f(session, self.engine.as_ref())
    }

    pub async fn remove_session(&self, id: &str) -> Result<(), ApiError> {
        match self.sessions.write().await.remove(id) {
            Some(_) => {
                info!(target: "assessment", session = %id, "Session discarded");
                Ok(())
            }
            None => Err(ApiError::SessionNotFound(id.to_string())),
        }
    }

    /// Drop every session idle for at least `session_idle_secs` as of `now`.
    pub async fn prune_idle_sessions(&self, now: Instant) -> usize {
        let ttl = Duration::from_secs(self.engine.settings.session_idle_secs);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for(now) < ttl);
        let dropped = before - sessions.len();
        if dropped > 0 {
            info!(target: "assessment", dropped, remaining = sessions.len(), "Idle sessions pruned");
        }
        dropped
    }

    /// Background task that prunes idle sessions until the runtime shuts down.
    pub fn spawn_idle_sweep(self: Arc<Self>) {
        let period = Duration::from_secs((self.engine.settings.session_idle_secs / 4).max(1));
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tick.tick().await;
                self.prune_idle_sessions(Instant::now()).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::from_config(AssessmentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn idle_sessions_are_pruned_and_active_ones_kept() {
        let state = state();
        let stale = state.create_session(None, Some(1)).await;
        let fresh = state.create_session(None, Some(2)).await;
        let ttl = Duration::from_secs(state.engine.settings.session_idle_secs);
        let later = Instant::now() + ttl;

        // Only `fresh` is used shortly before the sweep.
        {
            let mut sessions = state.sessions.write().await;
            sessions.get_mut(&fresh).unwrap().touch(later - Duration::from_secs(1));
        }

        assert_eq!(state.prune_idle_sessions(later).await, 1);
        let sessions = state.sessions.read().await;
        assert!(!sessions.contains_key(&stale));
        assert!(sessions.contains_key(&fresh));
    }

    #[tokio::test]
    async fn nothing_is_pruned_before_the_idle_limit() {
        let state = state();
        state.create_session(None, None).await;
        assert_eq!(state.prune_idle_sessions(Instant::now()).await, 0);
        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn pruned_session_is_not_found() {
        let state = state();
        let id = state.create_session(None, None).await;
        let ttl = Duration::from_secs(state.engine.settings.session_idle_secs);
        state.prune_idle_sessions(Instant::now() + ttl).await;
        let err = state.with_session(&id, |_, _| Ok(())).await.unwrap_err();
        assert!(matches!(err, ApiError::SessionNotFound(_)));
    }
}
