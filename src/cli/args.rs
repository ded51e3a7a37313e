use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Command line arguments for SessKit
#[derive(Parser, Debug)]
#[command(
    name = "sesskit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Server-side session lifecycle manager",
    long_about = "Inspect session providers and configuration, and exercise the session start/destroy/GC protocol with simulated concurrent visitors."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered session providers
    Providers,
    /// Configuration management commands
    Config(ConfigArgs),
    /// Drive simulated visitors through the session manager
    Simulate(SimulateArgs),
    /// Display version information
    Version,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Create a project configuration with defaults
    Init {
        /// Project directory (defaults to the current directory)
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Show configuration file locations
    Path,
}

/// Simulation arguments
#[derive(ClapArgs, Debug)]
pub struct SimulateArgs {
    /// Number of concurrent visitors
    #[arg(short = 'n', long, default_value = "100")]
    pub visitors: usize,

    /// Override the configured max lifetime in seconds
    #[arg(short, long)]
    pub lifetime: Option<u64>,

    /// Override the configured provider
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Destroy every session after its second request
    #[arg(short, long)]
    pub destroy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate() {
        let args = Args::try_parse_from([
            "sesskit", "simulate", "--visitors", "10", "--lifetime", "0", "--destroy",
        ])
        .unwrap();

        match args.command {
            Command::Simulate(sim) => {
                assert_eq!(sim.visitors, 10);
                assert_eq!(sim.lifetime, Some(0));
                assert!(sim.destroy);
                assert!(sim.provider.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let args = Args::try_parse_from(["sesskit", "-o", "json", "providers", "--verbose"]).unwrap();
        assert_eq!(args.output, OutputFormat::Json);
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Providers));
    }

    #[test]
    fn test_parse_config_init() {
        let args = Args::try_parse_from(["sesskit", "config", "init", "--path", "/tmp/app"]).unwrap();
        match args.command {
            Command::Config(ConfigArgs {
                command: ConfigCommand::Init { path },
            }) => assert_eq!(path.as_deref(), Some("/tmp/app")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
