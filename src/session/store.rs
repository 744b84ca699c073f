use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::session::models::TabSession;

/// Live tab sessions. Nothing here survives a restart.
pub struct SessionStore {
    sessions: DashMap<Uuid, TabSession>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    pub fn create(&self) -> Uuid {
        let session = TabSession::new();
        let id = session.id;
        self.sessions.insert(id, session);
        debug!("Created session {}", id);
        id
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    /// Owned copy for work that has to await.
    pub fn snapshot(&self, id: &Uuid) -> Option<TabSession> {
        let mut session = self.sessions.get_mut(id)?;
        session.touch();
        Some(session.value().clone())
    }

    /// Runs `f` under the entry lock. `f` must not block.
    pub fn update<R>(&self, id: &Uuid, f: impl FnOnce(&mut TabSession) -> R) -> Option<R> {
        let mut session = self.sessions.get_mut(id)?;
        session.touch();
        Some(f(session.value_mut()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn evict_idle(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        let idle_ttl = self.idle_ttl;
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen()) < idle_ttl);
        before.saturating_sub(self.sessions.len())
    }
}
