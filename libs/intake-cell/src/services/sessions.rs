// libs/intake-cell/src/services/sessions.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use crate::models::{WizardError, WizardSession};

/// In-memory wizard sessions, one per visitor. Lost on restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, now: NaiveDateTime) -> WizardSession {
        let session = WizardSession::new(now);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id, session.clone());
        debug!("Created intake session {}", session.session_id);
        session
    }

    pub async fn get(&self, session_id: Uuid) -> Result<WizardSession, WizardError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .cloned()
            .ok_or(WizardError::SessionNotFound(session_id))
    }

    /// Exclusive access to every session for a read-modify-write.
    pub async fn lock(&self) -> SessionGuard<'_> {
        SessionGuard {
            sessions: self.sessions.write().await,
        }
    }

    pub async fn save(&self, session: WizardSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id, session);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub struct SessionGuard<'a> {
    sessions: RwLockWriteGuard<'a, HashMap<Uuid, WizardSession>>,
}

impl SessionGuard<'_> {
    pub fn get(&self, session_id: Uuid) -> Result<WizardSession, WizardError> {
        self.sessions
            .get(&session_id)
            .cloned()
            .ok_or(WizardError::SessionNotFound(session_id))
    }

    pub fn save(&mut self, session: WizardSession) {
        self.sessions.insert(session.session_id, session);
    }
}
