// Core module - Session lifecycle and identifier transport
pub mod session;
pub mod transport;
