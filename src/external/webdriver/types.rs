use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Key under which W3C WebDriver returns element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Error code returned while an element is not (yet) in the page
pub const NO_SUCH_ELEMENT: &str = "no such element";

/// Error code returned when a previously found element left the page
pub const STALE_ELEMENT: &str = "stale element reference";

#[derive(Debug, Error)]
pub enum WebDriverError {
    #[error("WebDriver request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the WebDriver server, `error` is the W3C error code
    #[error("WebDriver error '{error}': {message}")]
    Command { error: String, message: String },

    #[error("Unexpected WebDriver response: {0}")]
    UnexpectedResponse(String),

    #[error("Timed out after {}s waiting for {what}", .after.as_secs())]
    Timeout { what: String, after: Duration },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl WebDriverError {
    /// The server could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, WebDriverError::Http(e) if e.is_connect())
    }

    pub fn is_code(&self, code: &str) -> bool {
        matches!(self, WebDriverError::Command { error, .. } if error == code)
    }
}

/// Element lookup strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub(crate) fn to_body(&self) -> Value {
        match self {
            Locator::Css(selector) => json!({ "using": "css selector", "value": selector }),
            Locator::XPath(path) => json!({ "using": "xpath", "value": path }),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css '{selector}'"),
            Locator::XPath(path) => write!(f, "xpath '{path}'"),
        }
    }
}

/// Opaque reference to an element of the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

/// Every WebDriver response wraps its payload in `value`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewSessionValue {
    pub session_id: String,
}

/// Capabilities for a Chrome session with the given command line arguments
pub fn chrome_capabilities(args: &[String]) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_body() {
        assert_eq!(
            Locator::Css("#side".to_string()).to_body(),
            json!({ "using": "css selector", "value": "#side" })
        );
        assert_eq!(
            Locator::XPath("//button".to_string()).to_body()["using"],
            "xpath"
        );
    }

    #[test]
    fn test_element_ref_deserialize() {
        let envelope: Envelope<ElementRef> = serde_json::from_value(json!({
            "value": { "element-6066-11e4-a52e-4f735466cecf": "abc-123" }
        }))
        .unwrap();
        assert_eq!(envelope.value.id, "abc-123");
    }

    #[test]
    fn test_chrome_capabilities() {
        let caps = chrome_capabilities(&["--start-maximized".to_string()]);
        assert_eq!(
            caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"][0],
            "--start-maximized"
        );
    }

    #[test]
    fn test_error_code_match() {
        let err = WebDriverError::Command {
            error: NO_SUCH_ELEMENT.to_string(),
            message: "no such element: Unable to locate element".to_string(),
        };
        assert!(err.is_code(NO_SUCH_ELEMENT));
        assert!(!err.is_code(STALE_ELEMENT));
        assert!(!err.is_unreachable());
    }
}
