//! Daemon binary for lapse.

use clap::{Parser, Subcommand};
use lapse::{Daemon, DaemonConfig, RetryQueue};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lapse: timelapse capture daemon.
#[derive(Parser)]
#[command(name = "lapsed", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run the capture daemon until interrupted.
    Run,

    /// Run one drain/capture cycle and exit.
    Once,

    /// Print the pending artifact backlog and exit.
    Queue,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Users can override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lapse=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        DaemonConfig::from_file(path)?
    } else {
        DaemonConfig::default()
    };

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            println!("lapsed v{}", env!("CARGO_PKG_VERSION"));
            let daemon = Daemon::new(config)?;
            daemon.run().await?;
        }
        Command::Once => {
            let mut daemon = Daemon::new(config)?;
            daemon.run_once()?;
        }
        Command::Queue => {
            let queue = RetryQueue::load(&config.queue.state_path)?;
            if queue.is_empty() {
                println!("queue is empty");
            } else {
                for path in queue.entries() {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
