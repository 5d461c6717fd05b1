use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::types::{
    ElementRef, Envelope, ErrorValue, Locator, NO_SUCH_ELEMENT, NewSessionValue, STALE_ELEMENT,
    WebDriverError,
};

/// Connection to a WebDriver server (chromedriver, geckodriver, ...)
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: Url,
}

impl WebDriverClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, WebDriverError> {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| WebDriverError::InvalidUrl(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    /// Start a browser session with the given capabilities body
    pub async fn new_session(&self, capabilities: &Value) -> Result<WebDriverSession, WebDriverError> {
        let value: NewSessionValue =
            command(&self.http, &self.base_url, Method::POST, "session", Some(capabilities)).await?;

        tracing::debug!(session_id = %value.session_id, "WebDriver session created");
        Ok(WebDriverSession {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            id: value.session_id,
        })
    }
}

/// One open browser session
#[derive(Debug)]
pub struct WebDriverSession {
    http: Client,
    base_url: Url,
    id: String,
}

impl WebDriverSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.call::<Value>(Method::POST, "url", Some(&json!({ "url": url })))
            .await
            .map(|_| ())
    }

    /// Find an element; `None` while it is not in the page
    pub async fn find_element(&self, locator: &Locator) -> Result<Option<ElementRef>, WebDriverError> {
        match self
            .call::<ElementRef>(Method::POST, "element", Some(&locator.to_body()))
            .await
        {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_code(NO_SUCH_ELEMENT) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn is_displayed(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        self.call(Method::GET, &format!("element/{}/displayed", element.id), None)
            .await
    }

    pub async fn is_enabled(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        self.call(Method::GET, &format!("element/{}/enabled", element.id), None)
            .await
    }

    pub async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.call::<Value>(
            Method::POST,
            &format!("element/{}/click", element.id),
            Some(&json!({})),
        )
        .await
        .map(|_| ())
    }

    /// Wait until `locator` is present, bounded by `timeout`
    pub async fn wait_for_presence(
        &self,
        locator: &Locator,
        timeout: Duration,
        poll: Duration,
    ) -> Result<ElementRef, WebDriverError> {
        self.bounded(locator, timeout, self.poll_until(locator, poll, false))
            .await
    }

    /// Wait until `locator` is present, displayed and enabled
    pub async fn wait_for_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
        poll: Duration,
    ) -> Result<ElementRef, WebDriverError> {
        self.bounded(locator, timeout, self.poll_until(locator, poll, true))
            .await
    }

    /// Close the browser and end the session
    pub async fn delete(&self) -> Result<(), WebDriverError> {
        let path = format!("session/{}", self.id);
        command::<Value>(&self.http, &self.base_url, Method::DELETE, &path, None)
            .await
            .map(|_| ())
    }

    async fn bounded(
        &self,
        locator: &Locator,
        timeout: Duration,
        poll: impl Future<Output = Result<ElementRef, WebDriverError>>,
    ) -> Result<ElementRef, WebDriverError> {
        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| WebDriverError::Timeout {
                what: locator.to_string(),
                after: timeout,
            })?
    }

    async fn poll_until(
        &self,
        locator: &Locator,
        poll: Duration,
        clickable: bool,
    ) -> Result<ElementRef, WebDriverError> {
        loop {
            if let Some(element) = self.find_element(locator).await? {
                if !clickable {
                    return Ok(element);
                }
                match self.is_clickable(&element).await {
                    Ok(true) => return Ok(element),
                    Ok(false) => {}
                    // Page re-rendered between lookup and check
                    Err(e) if e.is_code(STALE_ELEMENT) => {}
                    Err(e) => return Err(e),
                }
            }
            tokio::time::sleep(poll).await;
        }
    }

    async fn is_clickable(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        Ok(self.is_displayed(element).await? && self.is_enabled(element).await?)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        command_path: &str,
        body: Option<&Value>,
    ) -> Result<T, WebDriverError> {
        let path = format!("session/{}/{}", self.id, command_path);
        command(&self.http, &self.base_url, method, &path, body).await
    }
}

async fn command<T: DeserializeOwned>(
    http: &Client,
    base_url: &Url,
    method: Method,
    path: &str,
    body: Option<&Value>,
) -> Result<T, WebDriverError> {
    let url = base_url
        .join(path)
        .map_err(|e| WebDriverError::InvalidUrl(e.to_string()))?;

    let mut request = http.request(method.clone(), url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let payload: Value = response.json().await?;

    if !status.is_success() {
        let error = serde_json::from_value::<Envelope<ErrorValue>>(payload.clone())
            .map(|e| e.value)
            .map_err(|_| {
                WebDriverError::UnexpectedResponse(format!("{method} {path} returned {status}: {payload}"))
            })?;
        tracing::trace!(%method, path, code = %error.error, "WebDriver command failed");
        return Err(WebDriverError::Command {
            error: error.error,
            message: error.message,
        });
    }

    serde_json::from_value::<Envelope<T>>(payload)
        .map(|e| e.value)
        .map_err(|e| WebDriverError::UnexpectedResponse(format!("{method} {path}: {e}")))
}
