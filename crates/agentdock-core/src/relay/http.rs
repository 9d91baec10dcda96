//! reqwest-backed transport for the agent endpoint.

use anyhow::{Context, Result};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{RelayError, RelayResult};
use super::transport::{ChatReply, ChatRequest, ChatTransport, ResetReply, USER_AGENT};
use crate::config::EndpointConfig;

/// HTTP transport posting JSON to `{base_url}{chat_path}`.
pub struct HttpTransport {
    http: reqwest::Client,
    chat_url: String,
    reset_url: String,
}

impl HttpTransport {
    /// Creates a transport for the given base URL and endpoint paths.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, endpoint: &EndpointConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            chat_url: join_url(base_url, &endpoint.chat_path),
            reset_url: join_url(base_url, &endpoint.reset_path),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&ChatRequest>,
    ) -> RelayResult<T> {
        // Reset posts an empty body.
        let request = match body {
            Some(body) => self.http.post(url).headers(build_headers()).json(body),
            None => self.http.post(url),
        };

        debug!(url, "posting to agent endpoint");
        let response = request.send().await.map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RelayError::http_status(status.as_u16(), &error_body));
        }

        let text = response.text().await.map_err(classify_reqwest_error)?;
        serde_json::from_str(&text).map_err(|e| {
            let mut err = RelayError::generic(format!("Invalid response body: {e}"));
            err.details = Some(text);
            err
        })
    }
}

impl ChatTransport for HttpTransport {
    fn chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, RelayResult<ChatReply>> {
        self.post_json(&self.chat_url, Some(request)).boxed()
    }

    fn reset(&self) -> BoxFuture<'_, RelayResult<ResetReply>> {
        self.post_json(&self.reset_url, None).boxed()
    }
}

fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        RelayError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        RelayError::connectivity(format!("Connection failed: {e}"))
    } else if e.is_decode() || e.is_body() {
        RelayError::generic(format!("Failed to read response: {e}"))
    } else {
        RelayError::generic(format!("Network error: {e}"))
    }
}
