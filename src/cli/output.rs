use crate::cli::args::OutputFormat;
use crate::core::session::ManagerSummary;
use crate::domain::config::SessKitConfig;
use serde::Serialize;
use std::io;
use tabled::{Table, Tabled};

/// Outcome of a `simulate` run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub visitors: usize,
    pub completed: usize,
    pub failed: usize,
    pub unique_ids: usize,
    pub destroyed: usize,
    pub evicted: usize,
    pub elapsed_ms: u128,
    pub manager: ManagerSummary,
}

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_providers(&self, providers: &[String]) -> Result<(), OutputError>;
    fn write_config(&self, config: &SessKitConfig) -> Result<(), OutputError>;
    fn write_report(&self, report: &SimulationReport) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::SessKitError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Provider")]
    name: String,
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn report_rows(report: &SimulationReport) -> Vec<SettingRow> {
    vec![
        SettingRow { key: "provider", value: report.manager.provider.clone() },
        SettingRow { key: "cookie", value: report.manager.cookie_name.clone() },
        SettingRow { key: "max_lifetime", value: format!("{}s", report.manager.max_lifetime) },
        SettingRow { key: "visitors", value: report.visitors.to_string() },
        SettingRow { key: "completed", value: report.completed.to_string() },
        SettingRow { key: "failed", value: report.failed.to_string() },
        SettingRow { key: "unique_ids", value: report.unique_ids.to_string() },
        SettingRow { key: "destroyed", value: report.destroyed.to_string() },
        SettingRow { key: "evicted", value: report.evicted.to_string() },
        SettingRow { key: "live_sessions", value: report.manager.session_count.to_string() },
        SettingRow { key: "elapsed", value: format!("{}ms", report.elapsed_ms) },
    ]
}

fn config_rows(config: &SessKitConfig) -> Vec<SettingRow> {
    vec![
        SettingRow { key: "global.log_level", value: config.global.log_level.clone() },
        SettingRow { key: "manager.cookie_name", value: config.manager.cookie_name.clone() },
        SettingRow { key: "manager.provider", value: config.manager.provider.clone() },
        SettingRow { key: "manager.max_lifetime", value: config.manager.max_lifetime.to_string() },
    ]
}

impl OutputWriter for ConsoleWriter {
    fn write_providers(&self, providers: &[String]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                for provider in providers {
                    println!("{}", provider);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(providers)?);
            }
            OutputFormat::Table => {
                let rows: Vec<ProviderRow> = providers
                    .iter()
                    .map(|name| ProviderRow { name: name.clone() })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
        Ok(())
    }

    fn write_config(&self, config: &SessKitConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => print!("{}", toml::to_string_pretty(config)?),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
            OutputFormat::Table => println!("{}", Table::new(config_rows(config))),
        }
        Ok(())
    }

    fn write_report(&self, report: &SimulationReport) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!(
                    "Simulated {} visitors against provider '{}' in {}ms",
                    report.visitors, report.manager.provider, report.elapsed_ms
                );
                println!("  Completed: {} ({} failed)", report.completed, report.failed);
                println!("  Unique session IDs: {}", report.unique_ids);
                println!("  Destroyed: {}", report.destroyed);
                println!("  Evicted by GC: {}", report.evicted);
                println!("  Live sessions: {}", report.manager.session_count);
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
            OutputFormat::Table => println!("{}", Table::new(report_rows(report))),
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "message": message }));
            }
            _ => println!("{}", message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> SimulationReport {
        SimulationReport {
            visitors: 4,
            completed: 4,
            failed: 0,
            unique_ids: 4,
            destroyed: 2,
            evicted: 1,
            elapsed_ms: 12,
            manager: ManagerSummary {
                cookie_name: "gosessionid".to_string(),
                provider: "memory".to_string(),
                max_lifetime: 3600,
                session_count: 1,
            },
        }
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["unique_ids"], 4);
        assert_eq!(json["manager"]["provider"], "memory");
    }

    #[test]
    fn test_report_table_rows() {
        let rendered = Table::new(report_rows(&sample_report())).to_string();
        assert!(rendered.contains("unique_ids"));
        assert!(rendered.contains("3600s"));
    }

    #[test]
    fn test_config_table_rows() {
        let rendered = Table::new(config_rows(&SessKitConfig::default())).to_string();
        assert!(rendered.contains("manager.cookie_name"));
        assert!(rendered.contains("gosessionid"));
    }

    #[test]
    fn test_all_formats_write() {
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Table] {
            let writer = ConsoleWriter::new(format);
            assert!(writer.write_report(&sample_report()).is_ok());
            assert!(writer.write_providers(&["memory".to_string()]).is_ok());
            assert!(writer.write_message("done").is_ok());
        }
    }
}
