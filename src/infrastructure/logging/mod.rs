// Logging module - Logging infrastructure
use crate::domain::error::{SessKitError, SessKitResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system.
///
/// `RUST_LOG` wins over `level`; `verbose` forces debug output for this
/// crate. Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(level: &str, verbose: bool) -> SessKitResult<()> {
    let default_directive = if verbose {
        "sesskit=debug,warn".to_string()
    } else {
        format!("sesskit={},warn", level)
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_directive))
        .map_err(|e| SessKitError::Config {
            message: format!("Invalid log level '{}': {}", level, e),
        })?;

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("SessKit logging system initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init_is_idempotent() {
        assert!(init_logging("info", false).is_ok());
        assert!(init_logging("debug", true).is_ok());
    }
}
