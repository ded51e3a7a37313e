// Session module - Session lifecycle management
pub mod gc;
pub mod id;
pub mod manager;
pub mod provider;
pub mod registry;
pub mod session;
pub mod state;

pub use gc::GcHandle;
pub use id::{EntropySource, OsEntropy, SessionId, SESSION_ID_BYTES};
pub use manager::{ManagerSummary, SessionManager};
pub use provider::Provider;
pub use registry::{ProviderRegistry, MEMORY_PROVIDER};
pub use session::{Session, SessionValue};
pub use state::SessionState;
