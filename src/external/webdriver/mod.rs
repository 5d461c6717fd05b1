//! Minimal W3C WebDriver client.
//!
//! Covers the commands the messaging channel needs: new session, navigate,
//! find element, element displayed/enabled, click and delete session.

mod client;
mod types;

pub use client::{WebDriverClient, WebDriverSession};
pub use types::{ElementRef, Locator, WebDriverError, chrome_capabilities};
