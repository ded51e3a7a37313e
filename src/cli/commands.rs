use crate::cli::args::{Args, Command, ConfigCommand, SimulateArgs};
use crate::cli::output::{ConsoleWriter, OutputWriter, SimulationReport};
use crate::core::session::{ProviderRegistry, SessionManager};
use crate::core::transport::cookie::{CookieJar, ResponseCookies};
use crate::domain::config::SessKitConfig;
use crate::domain::error::{SessKitError, SessKitResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Execute CLI command
pub async fn execute_command(args: Args) -> SessKitResult<()> {
    let writer = ConsoleWriter::new(args.output);

    let config_manager = ConfigManager::new()?;
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path.as_ref())?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        init_logging(&config.global.log_level, args.verbose)?;
    }

    let registry = ProviderRegistry::with_defaults();

    match args.command {
        Command::Providers => {
            writer.write_providers(&registry.names())?;
            Ok(())
        }
        Command::Config(config_args) => {
            execute_config_command(config_args.command, &writer, &config, &config_manager)
        }
        Command::Simulate(sim_args) => {
            let report = run_simulation(&registry, &config, &sim_args).await?;
            writer.write_report(&report)?;
            Ok(())
        }
        Command::Version => {
            writer.write_message(&format!("sesskit {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

fn execute_config_command(
    command: ConfigCommand,
    writer: &ConsoleWriter,
    config: &SessKitConfig,
    config_manager: &ConfigManager,
) -> SessKitResult<()> {
    match command {
        ConfigCommand::Show => {
            writer.write_config(config)?;
        }
        ConfigCommand::Init { path } => {
            let dir = match path {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            let created = config_manager.init_project_config(&dir)?;
            writer.write_message(&format!("Created {}", created.display()))?;
        }
        ConfigCommand::Path => {
            writer.write_message(&format!(
                "global: {}",
                config_manager.get_global_config_path_ref().display()
            ))?;
            match config_manager.get_project_config_path() {
                Some(path) => writer.write_message(&format!("project: {}", path.display()))?,
                None => writer.write_message("project: (none)")?,
            }
        }
    }
    Ok(())
}

/// What one simulated visitor went through
struct VisitOutcome {
    session_id: String,
    destroyed: bool,
}

/// Drive `visitors` concurrent visitors through start, set, start-with-cookie
/// and get, then run one GC sweep.
pub async fn run_simulation(
    registry: &ProviderRegistry,
    config: &SessKitConfig,
    args: &SimulateArgs,
) -> SessKitResult<SimulationReport> {
    let mut manager_config = config.manager.clone();
    if let Some(lifetime) = args.lifetime {
        manager_config.max_lifetime = lifetime;
    }
    if let Some(provider) = &args.provider {
        manager_config.provider = provider.clone();
    }

    let manager = Arc::new(SessionManager::new(registry, &manager_config)?);
    let gc = manager.start_gc();
    let started = Instant::now();

    let mut handles = Vec::with_capacity(args.visitors);
    for visitor in 0..args.visitors {
        let manager = Arc::clone(&manager);
        let destroy = args.destroy;
        handles.push(tokio::spawn(async move {
            simulate_visitor(&manager, visitor, destroy).await
        }));
    }

    let mut completed = 0;
    let mut failed = 0;
    let mut destroyed = 0;
    let mut ids = HashSet::new();
    for handle in handles {
        match handle.await {
            Ok(Ok(outcome)) => {
                completed += 1;
                if outcome.destroyed {
                    destroyed += 1;
                }
                ids.insert(outcome.session_id);
            }
            Ok(Err(e)) => {
                warn!("Visitor failed: {}", e);
                failed += 1;
            }
            Err(e) => {
                warn!("Visitor task panicked: {}", e);
                failed += 1;
            }
        }
    }

    let evicted = manager.gc().await?;
    gc.shutdown().await;

    Ok(SimulationReport {
        visitors: args.visitors,
        completed,
        failed,
        unique_ids: ids.len(),
        destroyed,
        evicted,
        elapsed_ms: started.elapsed().as_millis(),
        manager: manager.summary().await?,
    })
}

async fn simulate_visitor(
    manager: &SessionManager,
    visitor: usize,
    destroy: bool,
) -> SessKitResult<VisitOutcome> {
    // First request: no cookie yet
    let mut response = ResponseCookies::new();
    let session = manager.session_start(&CookieJar::new(), &mut response).await?;
    session.set("visitor", json!(visitor)).await?;
    session.set("visits", json!(1)).await?;

    let cookie = response.get(manager.cookie_name()).ok_or_else(|| {
        SessKitError::Output(format!("visitor {} received no session cookie", visitor))
    })?;
    let request = CookieJar::new().with_cookie(&cookie.name, &cookie.value);

    // Second request: resume through the cookie
    let mut response = ResponseCookies::new();
    let session = manager.session_start(&request, &mut response).await?;
    let visits = session.get("visits").await.and_then(|v| v.as_u64()).unwrap_or(0);
    session.set("visits", json!(visits + 1)).await?;
    debug!("Visitor {} on session '{}' ({} visits)", visitor, session.session_id(), visits + 1);

    if destroy {
        manager.session_destroy(&request, &mut response).await?;
    }

    Ok(VisitOutcome {
        session_id: session.session_id().to_string(),
        destroyed: destroy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_args(visitors: usize, lifetime: Option<u64>, destroy: bool) -> SimulateArgs {
        SimulateArgs {
            visitors,
            lifetime,
            provider: None,
            destroy,
        }
    }

    #[tokio::test]
    async fn test_simulation_keeps_sessions() {
        let registry = ProviderRegistry::with_defaults();
        let report = run_simulation(&registry, &SessKitConfig::default(), &sim_args(20, None, false))
            .await
            .unwrap();

        assert_eq!(report.completed, 20);
        assert_eq!(report.failed, 0);
        assert_eq!(report.unique_ids, 20);
        assert_eq!(report.destroyed, 0);
        assert_eq!(report.manager.session_count, 20);
    }

    #[tokio::test]
    async fn test_simulation_with_destroy() {
        let registry = ProviderRegistry::with_defaults();
        let report = run_simulation(&registry, &SessKitConfig::default(), &sim_args(10, None, true))
            .await
            .unwrap();

        assert_eq!(report.destroyed, 10);
        assert_eq!(report.manager.session_count, 0);
    }

    #[tokio::test]
    async fn test_simulation_unknown_provider() {
        let registry = ProviderRegistry::with_defaults();
        let mut args = sim_args(1, None, false);
        args.provider = Some("redis".to_string());

        let result = run_simulation(&registry, &SessKitConfig::default(), &args).await;
        assert!(matches!(result, Err(SessKitError::Configuration(_))));
    }
}
