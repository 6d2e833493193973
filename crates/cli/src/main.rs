//! pathminer - path-context extraction for code corpora
//!
//! This binary provides the command-line interface for the extraction pipeline.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use clap::Parser;
use pathminer::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let config = cli.resolve_config()?;
    let stats = run(&config, &cli.dataset, &cli.output).await?;
    print!("{stats}");

    Ok(())
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pathminer={level},pathminer_core={level},pathminer_languages={level},\
             pathminer_storage={level},pathminer_pipeline={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
