use crate::core::session::{
    id::SessionId,
    session::{Session, SessionValue},
    state::SessionState,
};
use crate::domain::error::SessKitResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::trace;

/// Session held entirely in process memory
#[derive(Debug)]
pub struct MemorySession {
    id: SessionId,
    /// Lifecycle timestamps
    state: RwLock<SessionState>,
    /// Stored values
    values: RwLock<HashMap<String, SessionValue>>,
}

impl MemorySession {
    /// Create an empty session
    pub fn new(id: SessionId) -> Self {
        Self {
            state: RwLock::new(SessionState::new()),
            values: RwLock::new(HashMap::new()),
            id,
        }
    }

    /// Create a session under `id` carrying over values from a previous one
    pub(crate) fn with_values(
        id: SessionId,
        values: HashMap<String, SessionValue>,
        created_at: SystemTime,
    ) -> Self {
        let mut state = SessionState::new();
        state.created_at = created_at;

        Self {
            state: RwLock::new(state),
            values: RwLock::new(values),
            id,
        }
    }

    pub(crate) async fn touch(&self) {
        self.state.write().await.touch();
    }

    pub(crate) async fn is_expired(&self, max_lifetime: Duration) -> bool {
        self.state.read().await.is_expired(max_lifetime)
    }

    pub(crate) async fn snapshot_values(&self) -> HashMap<String, SessionValue> {
        self.values.read().await.clone()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn set(&self, key: &str, value: SessionValue) -> SessKitResult<()> {
        self.values.write().await.insert(key.to_string(), value);
        self.touch().await;
        trace!("Session '{}' set '{}'", self.id, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Option<SessionValue> {
        let value = self.values.read().await.get(key).cloned();
        self.touch().await;
        value
    }

    async fn delete(&self, key: &str) -> SessKitResult<()> {
        self.values.write().await.remove(key);
        self.touch().await;
        trace!("Session '{}' deleted '{}'", self.id, key);
        Ok(())
    }

    fn session_id(&self) -> &SessionId {
        &self.id
    }

    async fn created_at(&self) -> SystemTime {
        self.state.read().await.created_at
    }

    async fn last_accessed(&self) -> SystemTime {
        self.state.read().await.last_accessed
    }
}
