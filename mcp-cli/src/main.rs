use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use humantime_serde::re::humantime;
use mcp_probe_core::{ProbeConfig, ProbeRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcp-probe")]
#[command(about = "Check an MCP server's health, SSE session and tools/list endpoints")]
#[command(version)]
pub struct Cli {
    /// Server root (defaults to http://localhost:8000)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Configuration file (.toml, .yaml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pause between the health check and the SSE connect, e.g. "500ms"
    #[arg(long, value_parser = humantime::parse_duration)]
    settle: Option<Duration>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!("Probe configuration: {:?}", config);

    let mut runner = ProbeRunner::new(config).context("Failed to set up probe")?;
    let outcome = runner.run().await;

    Ok(ExitCode::from(outcome.exit_code()))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ProbeConfig> {
    let mut config = match &cli.config {
        Some(path) => ProbeConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProbeConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        let overridden = ProbeConfig::with_base_url(base_url)
            .with_context(|| format!("Invalid --base-url {}", base_url))?;
        config.base_url = overridden.base_url;
    }

    if let Some(settle) = cli.settle {
        config = config.settle_delay(settle);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let cli = Cli::parse_from(["mcp-probe"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "mcp-probe",
            "--base-url",
            "http://127.0.0.1:9000",
            "--settle",
            "150ms",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.settle_delay, Duration::from_millis(150));
    }

    #[test]
    fn test_bad_base_url_is_an_error() {
        let cli = Cli::parse_from(["mcp-probe", "--base-url", "localhost"]);
        assert!(load_config(&cli).is_err());
    }
}
