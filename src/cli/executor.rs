//! Command executor for dispatching CLI commands

use super::handlers::{
    CheckCommandHandler, CredentialsCommandHandler, PhonesCommandHandler, RunCommandHandler,
    RunOptions,
};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// No subcommand means `run` with default options.
///
/// # Errors
/// Returns errors from command handlers, and `AppError::RunAborted` when a
/// delivery run could not bring its channel up.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Run {
            dry_run, input, ..
        }) => {
            let options = RunOptions {
                dry_run: *dry_run,
                input: input.clone(),
            };
            run(settings, &options).await
        }
        None => run(settings, &RunOptions::default()).await,
        Some(Commands::Check) => CheckCommandHandler::new(settings).execute(),
        Some(Commands::Credentials { action }) => {
            CredentialsCommandHandler::new(&settings).execute(action)
        }
        Some(Commands::SetPhones { file }) => PhonesCommandHandler::new(settings).execute(file).await,
    }
}

async fn run(settings: Settings, options: &RunOptions) -> AppResult<()> {
    let report = RunCommandHandler::new(settings).execute(options).await?;

    match report.run_error() {
        Some(reason) => Err(AppError::RunAborted {
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn test_settings(dir: &TempDir) -> Settings {
        let mut config = Settings::default();
        config.database.credentials_file = dir.path().join("db.json").display().to_string();
        config.delivery.inter_message_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_execute_check() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["dunning-rs", "check"]).unwrap();

        assert!(execute_command(&cli, test_settings(&dir)).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_dry_run_with_empty_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("due.json");
        std::fs::write(&input, "[]").unwrap();

        let cli = Cli::try_parse_from([
            "dunning-rs",
            "run",
            "--dry-run",
            "--input",
            input.to_str().unwrap(),
        ])
        .unwrap();

        assert!(execute_command(&cli, test_settings(&dir)).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_cli() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            command: Some(Commands::Check),
            config: None,
            env: None,
            verbose: true,
            quiet: true,
        };

        let result = execute_command(&cli, test_settings(&dir)).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_credentials_roundtrip_through_executor() {
        let dir = TempDir::new().unwrap();
        let set = Cli::try_parse_from([
            "dunning-rs",
            "credentials",
            "set",
            "--host",
            "db.local",
            "--database",
            "erp",
            "--user",
            "cobranca",
            "--password",
            "x",
        ])
        .unwrap();
        execute_command(&set, test_settings(&dir)).await.unwrap();
        assert!(dir.path().join("db.json").is_file());

        let clear = Cli::try_parse_from(["dunning-rs", "credentials", "clear"]).unwrap();
        execute_command(&clear, test_settings(&dir)).await.unwrap();
        assert!(!dir.path().join("db.json").exists());
    }
}
