//! Scenery CLI
//!
//! Resolve references against scene bundles and load scene documents.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use scenery_cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scenery=debug".into()),
        )
        .init();

    let args = Args::parse();
    tracing::debug!(command = ?args.command, "Starting");

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = scenery_cli::run(args, &mut stdout).await {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
