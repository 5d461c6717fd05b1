//! Browser-driven messaging channel.
//!
//! Drives the messaging web client through a WebDriver server. The browser
//! profile directory persists between runs so the operator only has to scan
//! the login code once.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::config::ChannelConfig;
use crate::external::client::build_http_client;
use crate::external::webdriver::{
    Locator, WebDriverClient, WebDriverError, WebDriverSession, chrome_capabilities,
};
use crate::services::delivery::channel::{
    ChannelError, ChannelState, DeliveryChannel, expect_state, while_sending,
};
use crate::services::delivery::normalizer::NormalizedAddress;

/// Map a WebDriver failure of `operation` onto the channel vocabulary
///
/// Expired element waits and HTTP requests that outlived `request_timeout`
/// are timeouts; everything else is a protocol or reachability failure.
fn channel_error(
    operation: &'static str,
    request_timeout: Duration,
    error: WebDriverError,
) -> ChannelError {
    match error {
        WebDriverError::Timeout { after, .. } => ChannelError::Timeout { operation, after },
        WebDriverError::Http(e) if e.is_timeout() => ChannelError::Timeout {
            operation,
            after: request_timeout,
        },
        e if e.is_unreachable() => ChannelError::Unavailable(e.to_string()),
        e => ChannelError::Protocol(e.to_string()),
    }
}

pub struct WebDriverChannel {
    config: ChannelConfig,
    client: WebDriverClient,
    session: Option<WebDriverSession>,
    state: ChannelState,
}

impl WebDriverChannel {
    pub fn new(config: ChannelConfig) -> Result<Self, ChannelError> {
        let http = build_http_client(Duration::from_secs(config.request_timeout))
            .map_err(|e| ChannelError::Unavailable(e.to_string()))?;
        let client = WebDriverClient::new(http, &config.webdriver_url)
            .map_err(|e| ChannelError::Protocol(e.to_string()))?;

        Ok(Self {
            config,
            client,
            session: None,
            state: ChannelState::Disconnected,
        })
    }

    /// Compose URL for one message
    pub fn send_url(&self, address: &NormalizedAddress, body: &str) -> Result<Url, ChannelError> {
        send_url(&self.config, address, body)
    }

    fn browser_args(&self) -> Result<Vec<String>, ChannelError> {
        let profile = std::path::absolute(PathBuf::from(&self.config.profile_dir))
            .map_err(|e| ChannelError::Unavailable(format!("browser profile: {e}")))?;
        std::fs::create_dir_all(&profile).map_err(|e| {
            ChannelError::Unavailable(format!(
                "cannot create browser profile {}: {e}",
                profile.display()
            ))
        })?;

        let mut args = self.config.browser_args.clone();
        args.push(format!("--user-data-dir={}", profile.display()));
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        Ok(args)
    }

    fn session(&self) -> Result<&WebDriverSession, ChannelError> {
        self.session.as_ref().ok_or(ChannelError::InvalidState {
            operation: "use session",
            actual: self.state,
        })
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout)
    }
}

fn send_url(
    config: &ChannelConfig,
    address: &NormalizedAddress,
    body: &str,
) -> Result<Url, ChannelError> {
    let endpoint = format!("{}/send", config.base_url.trim_end_matches('/'));
    Url::parse_with_params(&endpoint, &[("phone", address.as_str()), ("text", body)])
        .map_err(|e| ChannelError::Protocol(format!("invalid send URL: {e}")))
}

/// One message, bounded as a whole by `send_timeout`
async fn deliver(
    config: &ChannelConfig,
    session: &WebDriverSession,
    address: &NormalizedAddress,
    body: &str,
) -> Result<(), ChannelError> {
    let send_timeout = Duration::from_secs(config.send_timeout);

    tokio::time::timeout(send_timeout, navigate_and_click(config, session, address, body))
        .await
        .map_err(|_| ChannelError::Timeout {
            operation: "send",
            after: send_timeout,
        })?
}

async fn navigate_and_click(
    config: &ChannelConfig,
    session: &WebDriverSession,
    address: &NormalizedAddress,
    body: &str,
) -> Result<(), ChannelError> {
    let send_timeout = Duration::from_secs(config.send_timeout);
    let poll = Duration::from_millis(config.poll_interval_ms);
    let request_timeout = Duration::from_secs(config.request_timeout);

    let url = send_url(config, address, body)?;
    session
        .navigate(url.as_str())
        .await
        .map_err(|e| channel_error("send", request_timeout, e))?;

    let button = session
        .wait_for_clickable(
            &Locator::XPath(config.send_button_xpath.clone()),
            send_timeout,
            poll,
        )
        .await
        .map_err(|e| channel_error("send", request_timeout, e))?;

    tokio::time::sleep(Duration::from_millis(config.pre_click_delay_ms)).await;
    session
        .click(&button)
        .await
        .map_err(|e| channel_error("send", request_timeout, e))?;
    tokio::time::sleep(Duration::from_millis(config.post_click_delay_ms)).await;

    Ok(())
}

#[async_trait]
impl DeliveryChannel for WebDriverChannel {
    async fn establish(&mut self) -> Result<(), ChannelError> {
        expect_state("establish", self.state, ChannelState::Disconnected)?;
        self.state = ChannelState::Connecting;

        let args = self.browser_args()?;
        tracing::info!(webdriver = %self.config.webdriver_url, "Opening browser session");
        let request_timeout = self.request_timeout();
        let session = self
            .client
            .new_session(&chrome_capabilities(&args))
            .await
            .map_err(|e| channel_error("establish", request_timeout, e))?;
        let navigated = session.navigate(&self.config.base_url).await;
        // Keep the session even if navigation failed so teardown closes the browser
        self.session = Some(session);
        navigated.map_err(|e| channel_error("establish", request_timeout, e))?;

        self.state = ChannelState::AwaitingAuthentication;
        Ok(())
    }

    async fn await_authentication(&mut self, timeout: Duration) -> Result<(), ChannelError> {
        expect_state(
            "await authentication",
            self.state,
            ChannelState::AwaitingAuthentication,
        )?;

        let poll = Duration::from_millis(self.config.poll_interval_ms);
        let ready = Locator::Css(self.config.ready_selector.clone());
        let request_timeout = self.request_timeout();
        self.session()?
            .wait_for_presence(&ready, timeout, poll)
            .await
            .map_err(|e| channel_error("authentication", request_timeout, e))?;

        tracing::info!("Messaging client logged in");
        self.state = ChannelState::Ready;
        Ok(())
    }

    async fn send(&mut self, address: &NormalizedAddress, body: &str) -> Result<(), ChannelError> {
        expect_state("send", self.state, ChannelState::Ready)?;

        let session = self.session.as_ref().ok_or(ChannelError::InvalidState {
            operation: "send",
            actual: self.state,
        })?;
        let delivery = deliver(&self.config, session, address, body);
        while_sending(&mut self.state, delivery).await
    }

    async fn teardown(&mut self) {
        if matches!(
            self.state,
            ChannelState::Disconnected | ChannelState::Closed
        ) {
            return;
        }

        if let Some(session) = self.session.take()
            && let Err(e) = session.delete().await
        {
            tracing::warn!(error = %e, session_id = session.id(), "Failed to close browser session");
        }
        self.state = ChannelState::Closed;
    }

    fn state(&self) -> ChannelState {
        self.state
    }

    fn name(&self) -> &'static str {
        "webdriver"
    }
}
