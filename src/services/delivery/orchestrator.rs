//! Delivery orchestration.
//!
//! Drives one batch of records through normalization, formatting and the
//! channel, strictly one record at a time. Failures of a single record are
//! recorded and the run moves on; only a channel that cannot be brought up
//! (establish or authentication) aborts the run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ChannelConfig, DeliveryConfig};
use crate::models::InvoiceRecord;
use crate::services::delivery::channel::{ChannelError, DeliveryChannel};
use crate::services::delivery::formatter::MessageFormatter;
use crate::services::delivery::normalizer::{self, NormalizedAddress};
use crate::services::delivery::report::{DeliveryOutcome, ReportBuilder, RunReport};
use crate::services::delivery::sink::StatusSink;

/// Run parameters of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub country_code: String,
    pub auth_timeout: Duration,
    /// Pause after a send attempt before the next record
    pub inter_message_delay: Duration,
}

impl DeliveryOptions {
    pub fn from_config(delivery: &DeliveryConfig, channel: &ChannelConfig) -> Self {
        Self {
            country_code: delivery.country_code.clone(),
            auth_timeout: channel.auth_timeout(),
            inter_message_delay: delivery.inter_message_delay(),
        }
    }
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default(), &ChannelConfig::default())
    }
}

/// Result of processing one record
struct Attempt {
    address: Option<NormalizedAddress>,
    outcome: DeliveryOutcome,
    detail: Option<String>,
    /// Whether the channel was asked to send
    sent_to_channel: bool,
}

impl Attempt {
    fn skipped(
        address: Option<NormalizedAddress>,
        outcome: DeliveryOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            address,
            outcome,
            detail: Some(detail.into()),
            sent_to_channel: false,
        }
    }

    /// Attempt whose processing unwound
    fn panicked(message: &str, sent_to_channel: bool) -> Self {
        Self {
            address: None,
            outcome: DeliveryOutcome::ChannelError,
            detail: Some(format!("unexpected failure: {message}")),
            sent_to_channel,
        }
    }
}

/// Runs delivery batches
///
/// # Example
/// ```ignore
/// let orchestrator = DeliveryOrchestrator::new(formatter, options, Arc::new(ConsoleSink));
/// let report = orchestrator.run(records, &mut channel).await;
/// println!("{}", report.summary_line());
/// ```
pub struct DeliveryOrchestrator {
    formatter: MessageFormatter,
    options: DeliveryOptions,
    sink: Arc<dyn StatusSink>,
}

impl DeliveryOrchestrator {
    pub fn new(
        formatter: MessageFormatter,
        options: DeliveryOptions,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            formatter,
            options,
            sink,
        }
    }

    pub fn options(&self) -> &DeliveryOptions {
        &self.options
    }

    /// Deliver every record through `channel` and report the outcomes
    ///
    /// An empty batch never touches the channel. Otherwise `teardown` runs
    /// exactly once, whatever happened to the individual records.
    pub async fn run(
        &self,
        records: Vec<InvoiceRecord>,
        channel: &mut dyn DeliveryChannel,
    ) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "delivery_run",
            run_id = %run_id,
            channel = channel.name(),
            total = records.len()
        );

        self.run_inner(run_id, records, channel)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        records: Vec<InvoiceRecord>,
        channel: &mut dyn DeliveryChannel,
    ) -> RunReport {
        let mut builder = ReportBuilder::new(run_id);

        if records.is_empty() {
            tracing::info!("No records to deliver");
            self.sink.status("No records to deliver.");
            return builder.finish();
        }

        if let Err(e) = self.bring_up(channel).await {
            let reason = e.to_string();
            tracing::error!(error = %reason, "Channel setup failed, aborting run");
            self.sink.status(&format!("Run aborted: {reason}"));

            channel.teardown().await;
            let report = builder.abort(records, reason);
            self.sink.status(&report.summary_line());
            return report;
        }

        let total = records.len();
        for (index, record) in records.into_iter().enumerate() {
            let position = index + 1;

            let mut reached_channel = false;
            let attempt = match AssertUnwindSafe(self.deliver_one(
                &record,
                channel,
                &mut reached_channel,
            ))
            .catch_unwind()
            .await
            {
                Ok(attempt) => attempt,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!(position, panic = %message, "Record processing panicked");
                    Attempt::panicked(&message, reached_channel)
                }
            };

            tracing::info!(
                position,
                outcome = %attempt.outcome,
                address = attempt.address.as_ref().map(NormalizedAddress::as_str),
                detail = attempt.detail.as_deref(),
                "Record processed"
            );
            self.report_status(&record, &attempt);

            let pause = attempt.sent_to_channel && position < total;
            builder.record(record, attempt.address, attempt.outcome, attempt.detail);

            if pause && !self.options.inter_message_delay.is_zero() {
                tokio::time::sleep(self.options.inter_message_delay).await;
            }
        }

        channel.teardown().await;

        let report = builder.finish();
        tracing::info!(
            sent = report.sent(),
            failed = report.failed(),
            "Delivery run finished"
        );
        self.sink.status(&report.summary_line());
        report
    }

    async fn bring_up(&self, channel: &mut dyn DeliveryChannel) -> Result<(), ChannelError> {
        self.sink.status(&format!("Opening {}...", channel.name()));
        channel.establish().await?;

        self.sink.status("Waiting for login...");
        channel
            .await_authentication(self.options.auth_timeout)
            .await?;

        tracing::info!("Channel ready");
        self.sink.status("Connected!");
        Ok(())
    }

    /// Process one record; `reached_channel` is set before the channel is asked to send
    async fn deliver_one(
        &self,
        record: &InvoiceRecord,
        channel: &mut dyn DeliveryChannel,
        reached_channel: &mut bool,
    ) -> Attempt {
        let Some(address) =
            normalizer::normalize_opt(record.phone_raw.as_deref(), &self.options.country_code)
        else {
            let raw = record.phone_raw.as_deref().unwrap_or_default();
            return Attempt::skipped(
                None,
                DeliveryOutcome::InvalidAddress,
                format!("phone '{raw}' is not dialable"),
            );
        };

        let body = match self.formatter.format(record) {
            Ok(body) => body,
            Err(e) => {
                return Attempt::skipped(Some(address), DeliveryOutcome::FormatError, e.to_string());
            }
        };

        *reached_channel = true;
        let (outcome, detail) = match channel.send(&address, &body).await {
            Ok(()) => (DeliveryOutcome::Sent, None),
            Err(e) if e.is_timeout() => (DeliveryOutcome::ChannelTimeout, Some(e.to_string())),
            Err(e) => (DeliveryOutcome::ChannelError, Some(e.to_string())),
        };

        Attempt {
            address: Some(address),
            outcome,
            detail,
            sent_to_channel: true,
        }
    }

    fn report_status(&self, record: &InvoiceRecord, attempt: &Attempt) {
        let target = attempt
            .address
            .as_ref()
            .map(|a| a.as_str().to_string())
            .unwrap_or_else(|| record.label().to_string());
        let detail = attempt.detail.as_deref().unwrap_or_default();

        let line = match attempt.outcome {
            DeliveryOutcome::Sent => format!("Sent to {target}"),
            DeliveryOutcome::InvalidAddress => {
                format!("Skipped {target}: invalid phone ({detail})")
            }
            DeliveryOutcome::FormatError => format!("Skipped {target}: {detail}"),
            DeliveryOutcome::ChannelTimeout => format!("Timed out sending to {target}: {detail}"),
            DeliveryOutcome::ChannelError | DeliveryOutcome::Aborted => {
                format!("Failed sending to {target}: {detail}")
            }
        };
        self.sink.status(&line);
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
