use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::ConversationId;
use super::session::Session;

/// Storage abstraction for active sessions, keyed by conversation.
///
/// `update` is the only way to change a slot. Implementations run `apply`
/// while no other call can observe or change the same conversation, so one
/// event at a time transitions a session.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &ConversationId) -> Result<Option<Session>, StoreError>;

    /// Hands `apply` the conversation's slot; whatever it leaves there is
    /// stored (`None` discards the session).
    fn update<T, F>(&self, id: &ConversationId, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Option<Session>) -> T;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; sessions vanish on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<ConversationId, Session>>>,
}

impl InMemorySessionStore {
    pub fn active_sessions(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ConversationId, Session>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session mutex poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &ConversationId) -> Result<Option<Session>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn update<T, F>(&self, id: &ConversationId, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Option<Session>) -> T,
    {
        let mut sessions = self.lock()?;
        let mut slot = sessions.remove(id);
        let output = apply(&mut slot);
        if let Some(session) = slot {
            sessions.insert(id.clone(), session);
        }
        Ok(output)
    }
}
