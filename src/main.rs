//! stablectl entry point.
//!
//! Logging goes to stderr through `tracing`; stdout is reserved for
//! command output so scripts can consume it.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stablectl::commands::{execute, Cli};
use stablectl::prompt::TerminalPrompt;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stablectl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let prompt = TerminalPrompt::new();

    if let Err(err) = execute(cli, &prompt).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
