use crate::core::session::{
    gc::GcHandle,
    id::{EntropySource, OsEntropy, SessionId},
    provider::Provider,
    registry::ProviderRegistry,
    session::Session,
};
use crate::core::transport::cookie::{decode_value, encode_value, Cookie, CookieJar, ResponseSink};
use crate::domain::config::ManagerConfig;
use crate::domain::error::{SessKitError, SessKitResult};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Shortest period the GC loop is scheduled with
const MIN_GC_INTERVAL: Duration = Duration::from_secs(1);

/// Session manager driving the start/destroy protocol against one provider
pub struct SessionManager {
    /// Cookie carrying the session identifier
    cookie_name: String,
    /// Idle expiry in seconds
    max_lifetime: u64,
    /// Registry name of the active provider
    provider_name: String,
    provider: Arc<dyn Provider>,
    /// Serializes start, destroy, regenerate and GC. A single lock keeps the
    /// provider view consistent; a per-identifier lock could replace it
    /// without changing behaviour.
    lock: Mutex<()>,
    entropy: Arc<dyn EntropySource>,
}

/// Snapshot of manager settings
#[derive(Debug, Clone, serde::Serialize)]
pub struct ManagerSummary {
    pub cookie_name: String,
    pub provider: String,
    pub max_lifetime: u64,
    pub session_count: usize,
}

impl SessionManager {
    /// Create a manager bound to the provider named in `config`
    pub fn new(registry: &ProviderRegistry, config: &ManagerConfig) -> SessKitResult<Self> {
        if config.cookie_name.trim().is_empty() {
            return Err(SessKitError::Configuration(
                "cookie name must not be empty".to_string(),
            ));
        }

        let provider = registry.resolve(&config.provider)?;

        info!(
            "Session manager using provider '{}' (cookie '{}', max lifetime {}s)",
            config.provider, config.cookie_name, config.max_lifetime
        );

        Ok(Self {
            cookie_name: config.cookie_name.clone(),
            max_lifetime: config.max_lifetime,
            provider_name: config.provider.clone(),
            provider,
            lock: Mutex::new(()),
            entropy: Arc::new(OsEntropy),
        })
    }

    /// Replace the randomness source used for new identifiers
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// Resolve the session for a request, creating one when the request
    /// carries no usable session cookie.
    pub async fn session_start(
        &self,
        request: &CookieJar,
        response: &mut dyn ResponseSink,
    ) -> SessKitResult<Arc<dyn Session>> {
        let _guard = self.lock.lock().await;

        match self.request_session_id(request) {
            Some(Ok(id)) => {
                let session = self
                    .provider
                    .session_read(&id, self.max_lifetime())
                    .await
                    .map_err(|e| self.log_provider_error("read", e))?;
                debug!("Resumed session '{}'", id);
                Ok(session)
            }
            Some(Err(e)) => {
                warn!("Ignoring unusable session cookie: {}", e);
                self.create_session(response).await
            }
            None => self.create_session(response).await,
        }
    }

    /// Destroy the request's session and tell the browser to drop its cookie.
    /// A request without a session cookie is left untouched.
    pub async fn session_destroy(
        &self,
        request: &CookieJar,
        response: &mut dyn ResponseSink,
    ) -> SessKitResult<()> {
        let Some(parsed) = self.request_session_id(request) else {
            debug!("No session cookie, nothing to destroy");
            return Ok(());
        };

        let _guard = self.lock.lock().await;

        match parsed {
            Ok(id) => {
                self.provider
                    .session_destroy(&id)
                    .await
                    .map_err(|e| self.log_provider_error("destroy", e))?;
                info!("Destroyed session '{}'", id);
            }
            Err(e) => warn!("Expiring unusable session cookie: {}", e),
        }

        response.add_cookie(self.removal_cookie());
        Ok(())
    }

    /// Move the request's session to a fresh identifier and reissue the cookie
    pub async fn session_regenerate_id(
        &self,
        request: &CookieJar,
        response: &mut dyn ResponseSink,
    ) -> SessKitResult<Arc<dyn Session>> {
        let _guard = self.lock.lock().await;

        let new_id = SessionId::generate_with(self.entropy.as_ref())?;

        let session = match self.request_session_id(request) {
            Some(Ok(old_id)) => {
                let session = self
                    .provider
                    .session_regenerate(&old_id, &new_id, self.max_lifetime())
                    .await
                    .map_err(|e| self.log_provider_error("regenerate", e))?;
                info!("Regenerated session '{}' as '{}'", old_id, new_id);
                session
            }
            _ => self
                .provider
                .session_init(&new_id)
                .await
                .map_err(|e| self.log_provider_error("init", e))?,
        };

        response.add_cookie(self.session_cookie(&new_id));
        Ok(session)
    }

    /// Run one GC sweep. Returns the number of evicted sessions.
    pub async fn gc(&self) -> SessKitResult<usize> {
        let _guard = self.lock.lock().await;

        let removed = self
            .provider
            .session_gc(self.max_lifetime())
            .await
            .map_err(|e| self.log_provider_error("gc", e))?;

        debug!("GC sweep evicted {} sessions", removed);
        Ok(removed)
    }

    /// Start the periodic GC loop
    pub fn start_gc(self: &Arc<Self>) -> GcHandle {
        GcHandle::spawn(Arc::clone(self))
    }

    /// Number of sessions held by the provider
    pub async fn session_count(&self) -> SessKitResult<usize> {
        self.provider.session_count().await
    }

    pub async fn summary(&self) -> SessKitResult<ManagerSummary> {
        Ok(ManagerSummary {
            cookie_name: self.cookie_name.clone(),
            provider: self.provider_name.clone(),
            max_lifetime: self.max_lifetime,
            session_count: self.session_count().await?,
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Idle expiry threshold
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime)
    }

    /// Period of the GC loop: the max lifetime, at least one second
    pub fn gc_interval(&self) -> Duration {
        self.max_lifetime().max(MIN_GC_INTERVAL)
    }

    // Private methods

    async fn create_session(&self, response: &mut dyn ResponseSink) -> SessKitResult<Arc<dyn Session>> {
        let id = SessionId::generate_with(self.entropy.as_ref()).map_err(|e| {
            error!("Failed to generate session identifier: {}", e);
            e
        })?;

        let session = self
            .provider
            .session_init(&id)
            .await
            .map_err(|e| self.log_provider_error("init", e))?;

        response.add_cookie(self.session_cookie(&id));
        info!("Started new session '{}'", id);
        Ok(session)
    }

    /// `None` when the cookie is absent or empty
    fn request_session_id(&self, request: &CookieJar) -> Option<SessKitResult<SessionId>> {
        let raw = request.get(&self.cookie_name).filter(|v| !v.is_empty())?;

        let decoded = match decode_value(raw) {
            Some(decoded) => decoded,
            None => {
                return Some(Err(SessKitError::CookieDecode(
                    "cookie value is not valid percent-encoding".to_string(),
                )))
            }
        };

        Some(SessionId::parse(&decoded))
    }

    fn session_cookie(&self, id: &SessionId) -> Cookie {
        Cookie::new(&self.cookie_name, &encode_value(id.as_str()))
            .with_path("/")
            .with_http_only(true)
            .with_max_age(i64::try_from(self.max_lifetime).unwrap_or(i64::MAX))
    }

    fn removal_cookie(&self) -> Cookie {
        Cookie::new(&self.cookie_name, "")
            .with_path("/")
            .with_http_only(true)
            .with_max_age(-1)
            .with_expires(SystemTime::now())
    }

    fn log_provider_error(&self, operation: &str, e: SessKitError) -> SessKitError {
        error!(
            "Provider '{}' failed during {}: {}",
            self.provider_name, operation, e
        );
        e
    }
}
