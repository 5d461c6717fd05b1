//! Run command handler
//!
//! Fetches the due invoices and pushes them through the delivery pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::repositories::PgRecipientSource;
use crate::services::delivery::{
    ConsoleSink, DeliveryOptions, DeliveryOrchestrator, DryRunChannel, FormatterOptions,
    MessageFormatter, RunReport, StatusSink, WebDriverChannel,
};
use crate::services::recipients::{JsonFileSource, RecipientQuery, RecipientSource};

/// Options of one `run` invocation
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub input: Option<PathBuf>,
}

/// Handler for the run command
pub struct RunCommandHandler {
    config: Settings,
    sink: Arc<dyn StatusSink>,
}

impl RunCommandHandler {
    /// Handler printing status lines to stdout
    pub fn new(config: Settings) -> Self {
        Self::with_sink(config, Arc::new(ConsoleSink))
    }

    pub fn with_sink(config: Settings, sink: Arc<dyn StatusSink>) -> Self {
        Self { config, sink }
    }

    /// Execute one delivery run
    ///
    /// # Returns
    /// The run report. An aborted run is still returned as `Ok`; the caller
    /// decides how to surface it.
    ///
    /// # Errors
    /// - Recipient source failures (database, input file)
    /// - WebDriver client construction errors
    pub async fn execute(&self, options: &RunOptions) -> AppResult<RunReport> {
        let source = self.source(options);
        let query = RecipientQuery::from(&self.config.query);

        self.sink.status(&format!(
            "Fetching invoices due in {} days from {}...",
            query.due_in_days,
            source.describe()
        ));
        let records = source.fetch(&query).await?;
        if !records.is_empty() {
            self.sink
                .status(&format!("{} invoice(s) to notify.", records.len()));
        }

        let orchestrator = DeliveryOrchestrator::new(
            MessageFormatter::new(FormatterOptions::from(&self.config.delivery)),
            DeliveryOptions::from_config(&self.config.delivery, &self.config.channel),
            Arc::clone(&self.sink),
        );

        let report = if options.dry_run {
            let mut channel = DryRunChannel::new();
            let report = orchestrator.run(records, &mut channel).await;
            for message in channel.outbox() {
                self.sink
                    .status(&format!("--- {} ---\n{}", message.address, message.body));
            }
            report
        } else {
            let mut channel = WebDriverChannel::new(self.config.channel.clone()).map_err(|e| {
                AppError::RunAborted {
                    reason: e.to_string(),
                }
            })?;
            orchestrator.run(records, &mut channel).await
        };

        tracing::info!(
            run_id = %report.run_id(),
            total = report.total(),
            sent = report.sent(),
            aborted = report.is_aborted(),
            "Run finished"
        );
        Ok(report)
    }

    fn source(&self, options: &RunOptions) -> Box<dyn RecipientSource> {
        match &options.input {
            Some(path) => Box::new(JsonFileSource::new(path.clone())),
            None => Box::new(PgRecipientSource::new(self.config.database.clone())),
        }
    }
}
