#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use warden::approval::ConfirmationDecision;
use warden::config::Config;
use warden::{cli, gateway};

/// `warden` — classify shell commands against a layered risk policy and
/// gate execution behind explicit approval.
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version)]
#[command(about = "Command authorization gateway", long_about = None)]
struct Cli {
    /// Path to config.toml (default: ~/.warden/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Bind address (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (default from config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Interactive shell: classify and gate each entered command
    Shell,
    /// Classify, gate, and run a single command
    Exec {
        /// The command line to submit
        command: String,
        /// Pre-supplied decision; omit to be prompted when needed
        #[arg(long)]
        confirm: Option<ConfirmFlag>,
    },
    /// Print the active policy table
    Policy,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ConfirmFlag {
    Yes,
    No,
}

fn decision_from(flag: Option<ConfirmFlag>) -> ConfirmationDecision {
    match flag {
        None => ConfirmationDecision::Unset,
        Some(ConfirmFlag::Yes) => ConfirmationDecision::Approved,
        Some(ConfirmFlag::No) => ConfirmationDecision::Rejected,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warden=info")),
        )
        .init();

    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            gateway::run_gateway(&host, port, config).await
        }
        Commands::Shell => cli::run_shell(config).await,
        Commands::Exec { command, confirm } => {
            let succeeded = cli::run_once(config, &command, decision_from(confirm)).await;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Policy => {
            cli::print_policy(&config);
            Ok(())
        }
    }
}
