//! Messaging channel abstraction.
//!
//! A channel is a stateful interactive session that delivers one message at
//! a time. Implementations move through
//!
//! ```text
//! Disconnected -> Connecting -> AwaitingAuthentication -> Ready
//!     -> {Sending -> Ready}* -> Closed
//! ```
//!
//! and report every failure as a [`ChannelError`]. Whether a failure is fatal
//! for the run is decided by the orchestrator, not by the channel.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use thiserror::Error;

use crate::services::delivery::normalizer::NormalizedAddress;

/// Lifecycle state of a channel session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    AwaitingAuthentication,
    Ready,
    Sending,
    Closed,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Connecting => "connecting",
            ChannelState::AwaitingAuthentication => "awaiting_authentication",
            ChannelState::Ready => "ready",
            ChannelState::Sending => "sending",
            ChannelState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Channel failures
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A bounded wait expired
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Operation called in the wrong lifecycle state
    #[error("cannot {operation} while {actual}")]
    InvalidState {
        operation: &'static str,
        actual: ChannelState,
    },

    /// The remote end answered with an error
    #[error("{0}")]
    Protocol(String),

    /// The remote end could not be reached
    #[error("channel unavailable: {0}")]
    Unavailable(String),
}

impl ChannelError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ChannelError::Timeout { .. })
    }
}

/// Interactive messaging session
///
/// Uses `async_trait` so the orchestrator can drive any implementation
/// through `&mut dyn DeliveryChannel`. The session is used by one task at a
/// time, so only `Send` is required.
#[async_trait]
pub trait DeliveryChannel: Send {
    /// Open the session. Only valid from `Disconnected`.
    async fn establish(&mut self) -> Result<(), ChannelError>;

    /// Wait until the operator has logged in, bounded by `timeout`
    ///
    /// Expiry is [`ChannelError::Timeout`].
    async fn await_authentication(&mut self, timeout: Duration) -> Result<(), ChannelError>;

    /// Deliver one message. Only valid in `Ready`; returns to `Ready` on
    /// success and on failure.
    async fn send(&mut self, address: &NormalizedAddress, body: &str) -> Result<(), ChannelError>;

    /// Release the session. Idempotent; a no-op when nothing was opened.
    async fn teardown(&mut self);

    /// Current lifecycle state
    fn state(&self) -> ChannelState;

    /// Channel name for logging
    fn name(&self) -> &'static str;
}

/// Guard for state-dependent operations
pub(crate) fn expect_state(
    operation: &'static str,
    actual: ChannelState,
    expected: ChannelState,
) -> Result<(), ChannelError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ChannelError::InvalidState { operation, actual })
    }
}

/// Hold `state` at `Sending` while `send` runs
///
/// The state returns to `Ready` when the send completes, fails or unwinds.
pub(crate) async fn while_sending<F, T>(state: &mut ChannelState, send: F) -> T
where
    F: Future<Output = T>,
{
    *state = ChannelState::Sending;
    let outcome = AssertUnwindSafe(send).catch_unwind().await;
    *state = ChannelState::Ready;

    match outcome {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
