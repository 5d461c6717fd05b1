//! End-to-end delivery runs over the dry-run channel
//!
//! Records come from a JSON file the way `dunning-rs run --input` reads them.

use std::sync::Arc;

use dunning_rs::config::{ChannelConfig, DeliveryConfig};
use dunning_rs::services::delivery::{
    ChannelState, DeliveryChannel, DeliveryOptions, DeliveryOrchestrator, DeliveryOutcome,
    DryRunChannel, FormatterOptions, MemorySink, MessageFormatter,
};
use dunning_rs::services::recipients::{JsonFileSource, RecipientQuery, RecipientSource};
use tempfile::TempDir;

const DUE_INVOICES: &str = r#"[
    {
        "debtor_name": "Ana Souza",
        "document_number": "1001",
        "phone_raw": "(11) 98765-4321",
        "amount": "1234.5",
        "due_date": "2024-05-10",
        "barcode": "34191.79001 01043.510047 91020.150008 1 96610000123450"
    },
    {
        "debtor_name": "Bruno Lima",
        "document_number": "1002",
        "phone_raw": "4321",
        "amount": "80",
        "due_date": "2024-05-10"
    },
    {
        "debtor_name": "Carla Dias",
        "document_number": "1003",
        "phone_raw": "5521998765432",
        "due_date": "2024-05-10"
    }
]"#;

fn orchestrator(sink: Arc<MemorySink>) -> DeliveryOrchestrator {
    let delivery = DeliveryConfig {
        inter_message_delay_ms: 0,
        ..Default::default()
    };
    DeliveryOrchestrator::new(
        MessageFormatter::new(FormatterOptions::from(&delivery)),
        DeliveryOptions::from_config(&delivery, &ChannelConfig::default()),
        sink,
    )
}

async fn load(content: &str) -> Vec<dunning_rs::models::InvoiceRecord> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("due.json");
    std::fs::write(&path, content).unwrap();

    let query = RecipientQuery {
        limit: None,
        ..Default::default()
    };
    JsonFileSource::new(path).fetch(&query).await.unwrap()
}

#[tokio::test]
async fn test_mixed_batch_skips_invalid_phone() {
    let records = load(DUE_INVOICES).await;
    let sink = Arc::new(MemorySink::new());
    let mut channel = DryRunChannel::new();

    let report = orchestrator(sink.clone()).run(records, &mut channel).await;

    assert_eq!(
        report.outcomes(),
        vec![
            DeliveryOutcome::Sent,
            DeliveryOutcome::InvalidAddress,
            DeliveryOutcome::Sent
        ]
    );
    assert_eq!(report.total(), 3);
    assert_eq!(report.sent(), 2);
    assert!(!report.is_aborted());

    let outbox = channel.outbox();
    assert_eq!(outbox.len(), 2);
    assert_eq!(outbox[0].address.as_str(), "5511987654321");
    assert_eq!(outbox[1].address.as_str(), "5521998765432");
    assert_eq!(channel.teardowns(), 1);
    assert_eq!(channel.state(), ChannelState::Closed);

    let lines = sink.lines();
    assert_eq!(lines.first().unwrap(), "Opening dry-run...");
    assert!(lines.contains(&"Connected!".to_string()));
    assert_eq!(lines.last().unwrap(), "Finished! Sent: 2/3");
}

#[tokio::test]
async fn test_notice_content() {
    let records = load(DUE_INVOICES).await;
    let mut channel = DryRunChannel::new();

    orchestrator(Arc::new(MemorySink::new()))
        .run(records, &mut channel)
        .await;

    let first = &channel.outbox()[0].body;
    assert!(first.contains("Ana Souza"));
    assert!(first.contains("1001"));
    assert!(first.contains("R$ 1.234,50"));
    assert!(first.contains("10/05/2024"));
    assert!(first.contains("Código de barras"));

    // Missing amount renders as zero and there is no barcode line
    let last = &channel.outbox()[1].body;
    assert!(last.contains("R$ 0,00"));
    assert!(!last.contains("Código de barras"));
}

#[tokio::test]
async fn test_empty_batch_never_opens_channel() {
    let records = load("[]").await;
    let sink = Arc::new(MemorySink::new());
    let mut channel = DryRunChannel::new();

    let report = orchestrator(sink.clone()).run(records, &mut channel).await;

    assert_eq!(report.total(), 0);
    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert_eq!(channel.teardowns(), 0);
    assert!(channel.outbox().is_empty());
    assert_eq!(sink.lines(), vec!["No records to deliver.".to_string()]);
}
