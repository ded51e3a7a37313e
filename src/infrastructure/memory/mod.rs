// Memory module - Reference in-memory session provider
pub mod provider;
pub mod session;

pub use provider::MemoryProvider;
pub use session::MemorySession;
