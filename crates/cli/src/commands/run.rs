//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{DestinationConfig, DestinationKind, MuxConfig};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Tee, TeeConfig};

/// Execute the `run` command
pub async fn run_tee(args: &RunArgs) -> Result<()> {
    let config = build_mux_config(args)?;

    info!(
        policy = %config.policy,
        destinations = config.destinations.len(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    if args.chunk_size == 0 {
        return Err(CliError::InvalidChunkSize {
            size: args.chunk_size,
        }
        .into());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let (multiplexer, registrations) =
        writemux::create_multiplexer(config).context("Failed to build destinations")?;

    let tee = Tee::new(
        multiplexer,
        registrations,
        TeeConfig {
            chunk_size: args.chunk_size,
        },
    );

    let stats = tee
        .run(tokio::io::stdin(), shutdown_signal())
        .await
        .context("Mirroring failed")?;

    info!(
        chunks = stats.write_stats.total_writes,
        bytes = stats.write_stats.total_bytes,
        duration_secs = stats.duration.as_secs_f64(),
        interrupted = stats.interrupted,
        "Input mirrored"
    );
    stats.print_summary();

    Ok(())
}

/// Merge the optional config file with destinations given as flags
fn build_mux_config(args: &RunArgs) -> Result<MuxConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            info!(config = %path.display(), "Loading configuration");
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => MuxConfig::default(),
    };

    if let Some(policy) = args.policy {
        info!(policy = ?policy, "Overriding error policy from CLI");
        config.policy = policy.into();
    }

    for path in &args.files {
        config.destinations.push(
            DestinationConfig::new(format!("file:{}", path.display()), DestinationKind::File)
                .with_param("path", path.display().to_string())
                .with_param("append", args.append.to_string()),
        );
    }
    for addr in &args.udp {
        config.destinations.push(
            DestinationConfig::new(format!("udp:{addr}"), DestinationKind::Network)
                .with_param("addr", addr.to_string()),
        );
    }
    if args.stdout {
        config
            .destinations
            .push(DestinationConfig::new("stdout", DestinationKind::Stdout));
    }
    if args.log {
        config
            .destinations
            .push(DestinationConfig::new("log", DestinationKind::Log));
    }

    config_loader::ConfigLoader::validate(&config).context("Invalid destination set")?;

    if config.destinations.is_empty() {
        warn!(policy = %config.policy, "No destinations configured");
    }

    Ok(config)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &MuxConfig) {
    eprintln!("\n=== Configuration Summary ===\n");
    eprintln!("Policy: {}", config.policy);
    eprintln!("\nDestinations ({}):", config.destinations.len());
    for destination in &config.destinations {
        eprintln!("  - {} ({})", destination.name, destination.kind.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PolicyArg;
    use contracts::ErrorPolicy;
    use std::path::PathBuf;

    fn args() -> RunArgs {
        RunArgs {
            config: None,
            files: Vec::new(),
            append: false,
            udp: Vec::new(),
            stdout: false,
            log: false,
            policy: None,
            chunk_size: 8192,
            metrics_port: 0,
            dry_run: false,
        }
    }

    #[test]
    fn test_flags_become_destinations() {
        let mut args = args();
        args.files = vec![PathBuf::from("a.log")];
        args.udp = vec!["127.0.0.1:7000".parse().unwrap()];
        args.log = true;
        args.policy = Some(PolicyArg::Propagate);

        let config = build_mux_config(&args).unwrap();

        assert_eq!(config.policy, ErrorPolicy::Propagate);
        let names: Vec<_> = config.destinations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["file:a.log", "udp:127.0.0.1:7000", "log"]);
        assert_eq!(config.destinations[0].param("append"), Some("false"));
    }

    #[test]
    fn test_config_file_merged_with_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mux.toml");
        std::fs::write(
            &path,
            "policy = \"propagate\"\n[[destinations]]\nname = \"dbg\"\nkind = \"log\"\n",
        )
        .unwrap();

        let mut args = args();
        args.config = Some(path);
        args.stdout = true;
        args.policy = Some(PolicyArg::Ignore);

        let config = build_mux_config(&args).unwrap();
        assert_eq!(config.policy, ErrorPolicy::Ignore);
        assert_eq!(config.destinations.len(), 2);
        assert_eq!(config.destinations[1].kind, DestinationKind::Stdout);
    }

    #[test]
    fn test_missing_config_file() {
        let mut args = args();
        args.config = Some(PathBuf::from("/definitely/not/here.toml"));
        let err = build_mux_config(&args).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
