// Infrastructure module - Storage backends and external adapters
pub mod config;
pub mod logging;
pub mod memory;
