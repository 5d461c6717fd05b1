//! Channel that performs no I/O.
//!
//! Used by `run --dry-run` to exercise the whole pipeline against real data
//! without opening a browser. Sent messages are kept for inspection.

use std::time::Duration;

use async_trait::async_trait;

use crate::services::delivery::channel::{
    ChannelError, ChannelState, DeliveryChannel, expect_state,
};
use crate::services::delivery::normalizer::NormalizedAddress;

/// A message accepted by the dry-run channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub address: NormalizedAddress,
    pub body: String,
}

#[derive(Debug)]
pub struct DryRunChannel {
    state: ChannelState,
    outbox: Vec<OutboundMessage>,
    teardowns: usize,
}

impl Default for DryRunChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunChannel {
    pub fn new() -> Self {
        Self {
            state: ChannelState::Disconnected,
            outbox: Vec::new(),
            teardowns: 0,
        }
    }

    pub fn outbox(&self) -> &[OutboundMessage] {
        &self.outbox
    }

    /// Number of teardowns that actually closed the session
    pub fn teardowns(&self) -> usize {
        self.teardowns
    }
}

#[async_trait]
impl DeliveryChannel for DryRunChannel {
    async fn establish(&mut self) -> Result<(), ChannelError> {
        expect_state("establish", self.state, ChannelState::Disconnected)?;
        self.state = ChannelState::AwaitingAuthentication;
        Ok(())
    }

    async fn await_authentication(&mut self, _timeout: Duration) -> Result<(), ChannelError> {
        expect_state(
            "await authentication",
            self.state,
            ChannelState::AwaitingAuthentication,
        )?;
        self.state = ChannelState::Ready;
        Ok(())
    }

    async fn send(&mut self, address: &NormalizedAddress, body: &str) -> Result<(), ChannelError> {
        expect_state("send", self.state, ChannelState::Ready)?;
        tracing::debug!(address = %address, chars = body.chars().count(), "Dry run send");
        self.outbox.push(OutboundMessage {
            address: address.clone(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn teardown(&mut self) {
        if matches!(
            self.state,
            ChannelState::Disconnected | ChannelState::Closed
        ) {
            return;
        }
        self.state = ChannelState::Closed;
        self.teardowns += 1;
    }

    fn state(&self) -> ChannelState {
        self.state
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::delivery::normalizer::normalize;

    #[tokio::test]
    async fn test_lifecycle() {
        let mut channel = DryRunChannel::new();
        let address = normalize("11987654321", "55").unwrap();

        assert_eq!(channel.state(), ChannelState::Disconnected);
        channel.establish().await.unwrap();
        channel
            .await_authentication(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(channel.state(), ChannelState::Ready);

        channel.send(&address, "olá").await.unwrap();
        assert_eq!(channel.state(), ChannelState::Ready);
        assert_eq!(channel.outbox().len(), 1);
        assert_eq!(channel.outbox()[0].body, "olá");

        channel.teardown().await;
        channel.teardown().await;
        assert_eq!(channel.state(), ChannelState::Closed);
        assert_eq!(channel.teardowns(), 1);
    }

    #[tokio::test]
    async fn test_send_before_ready_is_rejected() {
        let mut channel = DryRunChannel::new();
        let address = normalize("11987654321", "55").unwrap();

        let err = channel.send(&address, "x").await.unwrap_err();
        assert!(matches!(err, ChannelError::InvalidState { .. }));
        assert!(channel.outbox().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_on_disconnected_is_noop() {
        let mut channel = DryRunChannel::new();
        channel.teardown().await;
        assert_eq!(channel.state(), ChannelState::Disconnected);
        assert_eq!(channel.teardowns(), 0);
    }

    #[tokio::test]
    async fn test_establish_twice_is_rejected() {
        let mut channel = DryRunChannel::new();
        channel.establish().await.unwrap();
        assert!(channel.establish().await.is_err());
    }
}
