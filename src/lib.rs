//! SessKit Library
//!
//! Server-side session lifecycle management: unguessable session
//! identifiers carried in cookies, pluggable storage providers resolved
//! from an explicit registry, lock-guarded start/destroy operations and a
//! cancellable background expiry sweep.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use domain::error::{SessKitError, SessKitResult};
pub use domain::config::{ManagerConfig, SessKitConfig};
pub use crate::core::session::{
    EntropySource, GcHandle, Provider, ProviderRegistry, Session, SessionId, SessionManager,
    SessionValue, MEMORY_PROVIDER,
};
pub use crate::core::transport::{Cookie, CookieJar, ResponseCookies, ResponseSink};
pub use infrastructure::memory::{MemoryProvider, MemorySession};
