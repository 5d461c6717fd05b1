//! Overdue-invoice delivery pipeline.
//!
//! Records flow from a recipient source through the orchestrator, which
//! normalizes the phone, renders the notice and hands it to a channel, then
//! tallies the outcome in the run report:
//!
//! ```text
//! RecipientSource -> DeliveryOrchestrator -> {normalizer, MessageFormatter}
//!     -> DeliveryChannel::send -> RunReport -> StatusSink
//! ```

pub mod channel;
pub mod dry_run_channel;
pub mod formatter;
pub mod normalizer;
pub mod orchestrator;
pub mod report;
pub mod sink;
pub mod webdriver_channel;

pub use channel::{ChannelError, ChannelState, DeliveryChannel};
pub use dry_run_channel::{DryRunChannel, OutboundMessage};
pub use formatter::{CurrencyFormat, FormatError, FormatterOptions, MessageFormatter};
pub use normalizer::{NormalizedAddress, normalize};
pub use orchestrator::{DeliveryOptions, DeliveryOrchestrator};
pub use report::{DeliveryOutcome, DeliveryRecord, ReportBuilder, RunReport};
pub use sink::{ConsoleSink, MemorySink, StatusSink, TracingSink};
pub use webdriver_channel::WebDriverChannel;
