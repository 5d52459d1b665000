//! csvb binary entry point.
//!
//! Thin wrapper around the csvb-cli library that parses arguments,
//! initializes logging on stderr and runs the tool.

use anyhow::Result;
use csvb_cli::CliConfig;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CliConfig::from_args();

    // Logs go to stderr so JSON on stdout stays clean; RUST_LOG wins over --log-level
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(Level::from(config.log_level)).into())
                .from_env_lossy(),
        )
        .init();

    tracing::debug!(input = %config.input, output = ?config.output, "Configuration loaded");

    config.validate()?;
    csvb_cli::run(&config).await
}
