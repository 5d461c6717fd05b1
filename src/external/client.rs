use std::time::Duration;

use reqwest::Client;

/// User agent sent to the WebDriver server
pub const USER_AGENT: &str = concat!("dunning-rs/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for WebDriver commands
///
/// `request_timeout` bounds a single command. Element waits are longer than
/// that and are made of many short commands, so they are bounded separately
/// by the caller.
///
/// # Features
/// - **Connection pooling**: one keep-alive connection to the local driver
/// - **Timeouts**: per request, plus a 10s connect timeout
/// - **No proxy**: the driver normally listens on localhost
pub fn build_http_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .no_proxy()
        .user_agent(USER_AGENT)
        .build()
}
