use crate::core::session::id::SessionId;
use crate::domain::error::SessKitResult;
use async_trait::async_trait;
use std::time::SystemTime;

/// Value stored under a session key
pub type SessionValue = serde_json::Value;

/// Per-visitor key/value store handed to request-handling code.
///
/// A session may be reached again by a later request carrying the same
/// identifier, possibly while an earlier request still holds it, so every
/// implementation synchronizes its own state.
#[async_trait]
pub trait Session: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: SessionValue) -> SessKitResult<()>;

    /// Value stored under `key`, `None` when absent
    async fn get(&self, key: &str) -> Option<SessionValue>;

    /// Remove `key`; removing an absent key is not an error
    async fn delete(&self, key: &str) -> SessKitResult<()>;

    /// Identifier this session is stored under
    fn session_id(&self) -> &SessionId;

    async fn created_at(&self) -> SystemTime;

    async fn last_accessed(&self) -> SystemTime;
}
