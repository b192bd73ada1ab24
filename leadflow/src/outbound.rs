//! Outbound calls to the backend that performs CRM pushes and sends the
//! templated emails.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OutboundError {
    #[error("POST to {path} failed: {message}")]
    Transport { path: String, message: String },
}

/// One-shot JSON POST to a backend path.
///
/// At-most-one delivery: a failed call is reported, never retried. The
/// response body comes back as parsed JSON on any transport-level success;
/// HTTP status is deliberately not checked here, because application-level
/// success or failure lives inside the body for the integrations that care
/// (the CRM push embeds its status in a 200 response).
#[async_trait]
pub trait OutboundClient: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, OutboundError>;
}

/// Production client: joins a configured base URL with the integration path.
pub struct HttpOutboundClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpOutboundClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Bound each call; an expired call surfaces as a transport failure and
    /// is not retried.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl OutboundClient for HttpOutboundClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, OutboundError> {
        let url = format!("{}{}", self.base_url, path);
        info!("POSTing new lead data to {}", path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| OutboundError::Transport {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        info!("POSTed new lead data to {}", path);

        // Bodies that are not JSON (the email endpoints answer with plain
        // text) decode to Null; only integrations that declared interest in
        // the body ever look at it.
        Ok(response.json().await.unwrap_or(Value::Null))
    }
}
