use anyhow::Context;
use clap::Parser;

use dunning_rs::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = dunning_rs::pkg_version(),
        command = ?cli.command,
        "Starting"
    );

    execute_command(&cli, settings)
        .await
        .context("dunning-rs failed")
}
