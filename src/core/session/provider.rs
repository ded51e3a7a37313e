use crate::core::session::{id::SessionId, session::Session};
use crate::domain::error::SessKitResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Storage backend owning the sessions of one manager.
///
/// Backends (memory, filesystem, database, custom) report storage failures
/// as `SessKitError::Provider`; a missing session is never an error for
/// `session_read`, which creates one instead.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create and store an empty session under `id`
    async fn session_init(&self, id: &SessionId) -> SessKitResult<Arc<dyn Session>>;

    /// Return the live session under `id`, refreshing its last access.
    /// A missing session, or one idle for longer than `max_lifetime`, is
    /// replaced by a fresh empty session under the same identifier.
    async fn session_read(
        &self,
        id: &SessionId,
        max_lifetime: Duration,
    ) -> SessKitResult<Arc<dyn Session>>;

    /// Remove the session under `id`; removing an absent session succeeds
    async fn session_destroy(&self, id: &SessionId) -> SessKitResult<()>;

    /// Evict every session whose `last_access + max_lifetime < now`.
    /// Returns the number of sessions removed.
    async fn session_gc(&self, max_lifetime: Duration) -> SessKitResult<usize>;

    /// Move the values of `old` under `new`. A missing `old`, or one idle for
    /// longer than `max_lifetime`, yields a fresh empty session under `new`.
    async fn session_regenerate(
        &self,
        old: &SessionId,
        new: &SessionId,
        max_lifetime: Duration,
    ) -> SessKitResult<Arc<dyn Session>>;

    /// Number of stored sessions
    async fn session_count(&self) -> SessKitResult<usize>;
}
