use crate::core::session::{id::SessionId, provider::Provider, session::Session};
use crate::domain::error::SessKitResult;
use crate::infrastructure::memory::session::MemorySession;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Reference provider keeping every session in a process-local map
#[derive(Debug, Default)]
pub struct MemoryProvider {
    sessions: RwLock<HashMap<SessionId, Arc<MemorySession>>>,
}

impl MemoryProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is stored under `id`
    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    fn insert_fresh(
        sessions: &mut HashMap<SessionId, Arc<MemorySession>>,
        id: &SessionId,
    ) -> Arc<MemorySession> {
        let session = Arc::new(MemorySession::new(id.clone()));
        sessions.insert(id.clone(), Arc::clone(&session));
        session
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn session_init(&self, id: &SessionId) -> SessKitResult<Arc<dyn Session>> {
        let mut sessions = self.sessions.write().await;
        let session = Self::insert_fresh(&mut sessions, id);
        debug!("Initialized memory session '{}'", id);
        Ok(session)
    }

    async fn session_read(
        &self,
        id: &SessionId,
        max_lifetime: Duration,
    ) -> SessKitResult<Arc<dyn Session>> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get(id) {
            if !session.is_expired(max_lifetime).await {
                session.touch().await;
                return Ok(Arc::clone(session) as Arc<dyn Session>);
            }
            debug!("Memory session '{}' expired, recreating", id);
        } else {
            debug!("Memory session '{}' not found, creating", id);
        }

        Ok(Self::insert_fresh(&mut sessions, id))
    }

    async fn session_destroy(&self, id: &SessionId) -> SessKitResult<()> {
        if self.sessions.write().await.remove(id).is_some() {
            debug!("Destroyed memory session '{}'", id);
        }
        Ok(())
    }

    async fn session_gc(&self, max_lifetime: Duration) -> SessKitResult<usize> {
        let mut sessions = self.sessions.write().await;

        let mut expired = Vec::new();
        for (id, session) in sessions.iter() {
            if session.is_expired(max_lifetime).await {
                expired.push(id.clone());
            }
        }

        for id in &expired {
            sessions.remove(id);
        }

        if !expired.is_empty() {
            info!(
                "Evicted {} expired memory sessions ({} remaining)",
                expired.len(),
                sessions.len()
            );
        }
        Ok(expired.len())
    }

    async fn session_regenerate(
        &self,
        old: &SessionId,
        new: &SessionId,
        max_lifetime: Duration,
    ) -> SessKitResult<Arc<dyn Session>> {
        let mut sessions = self.sessions.write().await;

        let mut previous = sessions.remove(old);
        if let Some(stale) = &previous {
            if stale.is_expired(max_lifetime).await {
                debug!("Memory session '{}' expired, not carrying values", old);
                previous = None;
            }
        }

        let session = match previous {
            Some(previous) => Arc::new(MemorySession::with_values(
                new.clone(),
                previous.snapshot_values().await,
                previous.created_at().await,
            )),
            None => Arc::new(MemorySession::new(new.clone())),
        };

        sessions.insert(new.clone(), Arc::clone(&session));
        debug!("Regenerated memory session '{}' as '{}'", old, new);
        Ok(session)
    }

    async fn session_count(&self) -> SessKitResult<usize> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOUR: Duration = Duration::from_secs(3600);

    fn new_id() -> SessionId {
        SessionId::generate().unwrap()
    }

    #[tokio::test]
    async fn test_init_and_read() {
        let provider = MemoryProvider::new();
        let id = new_id();

        let session = provider.session_init(&id).await.unwrap();
        session.set("k", json!("v")).await.unwrap();

        let read = provider.session_read(&id, HOUR).await.unwrap();
        assert_eq!(read.session_id(), &id);
        assert_eq!(read.get("k").await, Some(json!("v")));
        assert_eq!(provider.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_read_missing_creates() {
        let provider = MemoryProvider::new();
        let id = new_id();

        let session = provider.session_read(&id, HOUR).await.unwrap();
        assert_eq!(session.session_id(), &id);
        assert_eq!(session.get("k").await, None);
        assert!(provider.contains(&id).await);
    }

    #[tokio::test]
    async fn test_read_refreshes_last_access() {
        let provider = MemoryProvider::new();
        let id = new_id();
        let session = provider.session_init(&id).await.unwrap();
        let before = session.last_accessed().await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        provider.session_read(&id, HOUR).await.unwrap();

        assert!(session.last_accessed().await > before);
    }

    #[tokio::test]
    async fn test_read_expired_recreates() {
        let provider = MemoryProvider::new();
        let id = new_id();
        let session = provider.session_init(&id).await.unwrap();
        session.set("k", json!("stale")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let read = provider.session_read(&id, Duration::ZERO).await.unwrap();

        assert_eq!(read.get("k").await, None);
        assert_eq!(provider.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_destroy() {
        let provider = MemoryProvider::new();
        let id = new_id();
        provider.session_init(&id).await.unwrap();

        provider.session_destroy(&id).await.unwrap();
        assert!(!provider.contains(&id).await);

        // Destroying twice is harmless
        assert!(provider.session_destroy(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_gc_zero_lifetime_removes_all() {
        let provider = MemoryProvider::new();
        for _ in 0..25 {
            provider.session_init(&new_id()).await.unwrap();
        }

        tokio::time::sleep(Duration::from_millis(5)).await;
        let removed = provider.session_gc(Duration::ZERO).await.unwrap();

        assert_eq!(removed, 25);
        assert_eq!(provider.session_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_gc_keeps_recent_sessions() {
        let provider = MemoryProvider::new();
        let stale = new_id();
        let fresh = new_id();
        provider.session_init(&stale).await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        provider.session_init(&fresh).await.unwrap();

        let removed = provider.session_gc(Duration::from_millis(200)).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!provider.contains(&stale).await);
        assert!(provider.contains(&fresh).await);
    }

    #[tokio::test]
    async fn test_regenerate_moves_values() {
        let provider = MemoryProvider::new();
        let old = new_id();
        let new = new_id();
        let session = provider.session_init(&old).await.unwrap();
        session.set("user", json!("alice")).await.unwrap();

        let regenerated = provider.session_regenerate(&old, &new, HOUR).await.unwrap();

        assert_eq!(regenerated.session_id(), &new);
        assert_eq!(regenerated.get("user").await, Some(json!("alice")));
        assert!(!provider.contains(&old).await);
        assert_eq!(provider.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_missing_creates_empty() {
        let provider = MemoryProvider::new();
        let new = new_id();

        let session = provider.session_regenerate(&new_id(), &new, HOUR).await.unwrap();
        assert_eq!(session.session_id(), &new);
        assert_eq!(session.get("user").await, None);
    }

    #[tokio::test]
    async fn test_regenerate_expired_drops_values() {
        let provider = MemoryProvider::new();
        let old = new_id();
        let new = new_id();
        let session = provider.session_init(&old).await.unwrap();
        session.set("user", json!("alice")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        let regenerated = provider
            .session_regenerate(&old, &new, Duration::from_millis(200))
            .await
            .unwrap();

        assert_eq!(regenerated.session_id(), &new);
        assert_eq!(regenerated.get("user").await, None);
        assert!(!provider.contains(&old).await);
        assert_eq!(provider.session_count().await.unwrap(), 1);
    }
}
