//! Per-run outcome tracking.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use crate::models::InvoiceRecord;
use crate::services::delivery::normalizer::NormalizedAddress;

/// What happened to one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent,
    InvalidAddress,
    FormatError,
    ChannelTimeout,
    ChannelError,
    /// The run aborted before this record was attempted
    Aborted,
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Sent => "sent",
            DeliveryOutcome::InvalidAddress => "invalid_address",
            DeliveryOutcome::FormatError => "format_error",
            DeliveryOutcome::ChannelTimeout => "channel_timeout",
            DeliveryOutcome::ChannelError => "channel_error",
            DeliveryOutcome::Aborted => "aborted",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the report, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRecord {
    pub record: InvoiceRecord,
    pub address: Option<NormalizedAddress>,
    pub outcome: DeliveryOutcome,
    pub detail: Option<String>,
}

/// Finalized, read-only result of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    run_id: Uuid,
    entries: Vec<DeliveryRecord>,
    run_error: Option<String>,
    started_at: Timestamp,
    finished_at: Timestamp,
}

impl RunReport {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn sent(&self) -> usize {
        self.count(DeliveryOutcome::Sent)
    }

    pub fn failed(&self) -> usize {
        self.total() - self.sent()
    }

    pub fn count(&self, outcome: DeliveryOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn entries(&self) -> &[DeliveryRecord] {
        &self.entries
    }

    pub fn outcomes(&self) -> Vec<DeliveryOutcome> {
        self.entries.iter().map(|e| e.outcome).collect()
    }

    /// Run-level failure, set when the channel could not be brought up
    pub fn run_error(&self) -> Option<&str> {
        self.run_error.as_deref()
    }

    pub fn is_aborted(&self) -> bool {
        self.run_error.is_some()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn finished_at(&self) -> Timestamp {
        self.finished_at
    }

    /// Operator summary, e.g. `Finished! Sent: 2/3`
    pub fn summary_line(&self) -> String {
        format!("Finished! Sent: {}/{}", self.sent(), self.total())
    }
}

/// Append-only accumulator used while a run is in progress
#[derive(Debug)]
pub struct ReportBuilder {
    run_id: Uuid,
    entries: Vec<DeliveryRecord>,
    run_error: Option<String>,
    started_at: Timestamp,
}

impl ReportBuilder {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            entries: Vec::new(),
            run_error: None,
            started_at: Timestamp::now(),
        }
    }

    pub fn record(
        &mut self,
        record: InvoiceRecord,
        address: Option<NormalizedAddress>,
        outcome: DeliveryOutcome,
        detail: Option<String>,
    ) {
        self.entries.push(DeliveryRecord {
            record,
            address,
            outcome,
            detail,
        });
    }

    /// Mark the run as aborted; every record becomes `Aborted`
    pub fn abort(mut self, records: Vec<InvoiceRecord>, reason: impl Into<String>) -> RunReport {
        let reason = reason.into();
        self.entries = records
            .into_iter()
            .map(|record| DeliveryRecord {
                record,
                address: None,
                outcome: DeliveryOutcome::Aborted,
                detail: Some(reason.clone()),
            })
            .collect();
        self.run_error = Some(reason);
        self.finish()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            entries: self.entries,
            run_error: self.run_error,
            started_at: self.started_at,
            finished_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> InvoiceRecord {
        InvoiceRecord {
            debtor_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_and_summary() {
        let mut builder = ReportBuilder::new(Uuid::new_v4());
        builder.record(named("a"), None, DeliveryOutcome::Sent, None);
        builder.record(named("b"), None, DeliveryOutcome::InvalidAddress, None);
        builder.record(
            named("c"),
            None,
            DeliveryOutcome::ChannelTimeout,
            Some("send timed out after 35s".to_string()),
        );
        builder.record(named("d"), None, DeliveryOutcome::Sent, None);
        let report = builder.finish();

        assert_eq!(report.total(), 4);
        assert_eq!(report.sent(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.count(DeliveryOutcome::ChannelTimeout), 1);
        assert_eq!(report.summary_line(), "Finished! Sent: 2/4");
        assert!(!report.is_aborted());
        assert!(report.finished_at() >= report.started_at());
    }

    #[test]
    fn test_order_preserved() {
        let mut builder = ReportBuilder::new(Uuid::new_v4());
        for name in ["x", "y", "z"] {
            builder.record(named(name), None, DeliveryOutcome::Sent, None);
        }
        let report = builder.finish();
        let names: Vec<_> = report.entries().iter().map(|e| e.record.label()).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[test]
    fn test_abort_marks_every_record() {
        let builder = ReportBuilder::new(Uuid::new_v4());
        let report = builder.abort(vec![named("a"), named("b")], "authentication timed out");

        assert_eq!(report.total(), 2);
        assert_eq!(report.sent(), 0);
        assert_eq!(
            report.outcomes(),
            [DeliveryOutcome::Aborted, DeliveryOutcome::Aborted]
        );
        assert_eq!(report.run_error(), Some("authentication timed out"));
        assert_eq!(report.summary_line(), "Finished! Sent: 0/2");
    }

    #[test]
    fn test_empty_report() {
        let report = ReportBuilder::new(Uuid::new_v4()).finish();
        assert_eq!(report.total(), 0);
        assert_eq!(report.summary_line(), "Finished! Sent: 0/0");
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&DeliveryOutcome::ChannelTimeout).unwrap();
        assert_eq!(json, "\"channel_timeout\"");
    }
}
