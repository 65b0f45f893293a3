//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use contracts::ErrorPolicy;

/// writemux - mirror one input stream to many destinations
#[derive(Parser, Debug)]
#[command(
    name = "writemux",
    author,
    version,
    about = "Mirror stdin to files, UDP peers, stdout and logs",
    long_about = "Reads standard input and writes every chunk to each configured destination.\n\n\
                  Destinations come from a TOML/JSON config file and/or command-line flags.\n\
                  Logs are written to stderr so stdout can itself be a destination."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "WRITEMUX_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "WRITEMUX_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror stdin to every destination
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configured destinations
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "WRITEMUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mirror into this file (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Append to files given with --file instead of truncating them
    #[arg(short, long)]
    pub append: bool,

    /// Mirror to this UDP address (repeatable)
    #[arg(short, long = "udp", value_name = "ADDR")]
    pub udp: Vec<SocketAddr>,

    /// Mirror to standard output
    #[arg(long)]
    pub stdout: bool,

    /// Log a summary of every chunk
    #[arg(long)]
    pub log: bool,

    /// Error policy, overriding the configuration file
    #[arg(short, long, value_enum, env = "WRITEMUX_POLICY")]
    pub policy: Option<PolicyArg>,

    /// Read size in bytes; each read becomes one multiplexer write
    #[arg(long, default_value = "8192", env = "WRITEMUX_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "WRITEMUX_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without reading input
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "writemux.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "writemux.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Error policy as a CLI value
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PolicyArg {
    /// Keep going past failing destinations
    Ignore,
    /// Stop at the first failing destination
    Propagate,
}

impl From<PolicyArg> for ErrorPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Ignore => Self::Ignore,
            PolicyArg::Propagate => Self::Propagate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "writemux",
            "run",
            "--file",
            "a.log",
            "-f",
            "b.log",
            "--udp",
            "127.0.0.1:9000",
            "--policy",
            "propagate",
            "--stdout",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.udp[0].port(), 9000);
        assert!(matches!(args.policy, Some(PolicyArg::Propagate)));
        assert!(args.stdout);
        assert_eq!(args.chunk_size, 8192);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["writemux", "-q", "-v", "run"]).is_err());
    }
}
