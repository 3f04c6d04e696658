//! `triagem`: acquisition decisions for legal processes.

mod server;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use triagem_core::{policy, preliminary_checks, Process};
use triagem_runtime::{DecisionOrchestrator, RuntimeConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (environment variables still override it)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on a process file (JSON or YAML)
    Evaluate {
        file: PathBuf,
        /// Print the full report (source, provider, timestamp) instead of the decision
        #[arg(long)]
        report: bool,
    },
    /// Run the deterministic rules only
    Rules { file: PathBuf },
    /// List the acquisition policies
    Policies,
    /// Show the active configuration (secrets redacted)
    Config,
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Policies => print_json(&policy::registry().collect::<Vec<_>>()),
        Commands::Rules { file } => {
            let process = load_process(&file)?;
            print_json(&preliminary_checks(&process))
        }
        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print_json(&config)
        }
        Commands::Evaluate { file, report } => {
            let config = load_config(cli.config.as_deref())?;
            let process = load_process(&file)?;
            let orchestrator = DecisionOrchestrator::from_config(&config);
            let result = orchestrator.decide(&process).await;
            if report {
                print_json(&result)
            } else {
                print_json(&result.decision)
            }
        }
        Commands::Serve { host, port } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let addr: SocketAddr = config
                .server
                .bind_address()
                .parse()
                .with_context(|| format!("invalid bind address {}", config.server.bind_address()))?;

            tracing::info!(
                provider = %config.llm.provider,
                model = %config.llm.model,
                webhook = config.webhook.url.is_some(),
                "Starting triagem"
            );

            let orchestrator = DecisionOrchestrator::from_config(&config);
            server::serve(addr, server::AppState::new(orchestrator, &config)).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    RuntimeConfig::load(path).context("failed to load configuration")
}

fn load_process(path: &Path) -> Result<Process> {
    Process::from_file(path).with_context(|| format!("failed to load process {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::parse_from(["triagem", "-v", "evaluate", "case.json", "--report"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Evaluate { report: true, .. }
        ));
    }

    #[test]
    fn test_parse_serve_with_config() {
        let cli = Cli::parse_from([
            "triagem", "serve", "--port", "9000", "--config", "triagem.yaml",
        ]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("triagem.yaml")));
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_policies_serialize() {
        let value = json!(policy::registry().collect::<Vec<_>>());
        assert_eq!(value.as_array().unwrap().len(), 8);
        assert_eq!(value[0]["code"], "POL-1");
    }
}
