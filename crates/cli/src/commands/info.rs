//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    policy: String,
    destinations: Vec<DestinationInfo>,
}

#[derive(Serialize)]
struct DestinationInfo {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let info = build_config_info(&config);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &contracts::MuxConfig) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", config.version),
        policy: config.policy.to_string(),
        destinations: config
            .destinations
            .iter()
            .map(|d| DestinationInfo {
                name: d.name.clone(),
                kind: d.kind.as_str().to_string(),
                params: d.params.clone().into_iter().collect(),
            })
            .collect(),
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("Version: {}", info.version);
    println!("Policy:  {}", info.policy);
    println!("\nDestinations ({}):", info.destinations.len());
    for destination in &info.destinations {
        println!("  - {} [{}]", destination.name, destination.kind);
        for (key, value) in &destination.params {
            println!("      {} = {}", key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DestinationConfig, DestinationKind, MuxConfig};

    #[test]
    fn test_build_config_info() {
        let config = MuxConfig {
            destinations: vec![DestinationConfig::new("udp", DestinationKind::Network)
                .with_param("addr", "127.0.0.1:1")],
            ..Default::default()
        };

        let info = build_config_info(&config);
        assert_eq!(info.policy, "ignore");
        assert_eq!(info.destinations[0].kind, "network");
        assert_eq!(info.destinations[0].params["addr"], "127.0.0.1:1");
    }

    #[test]
    fn test_missing_config_file() {
        let args = InfoArgs {
            config: "/no/such/writemux.toml".into(),
            json: false,
        };

        let err = run_info(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigNotFound { path }) if path == "/no/such/writemux.toml"
        ));
    }
}
