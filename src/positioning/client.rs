/// HTTP client for the magic positioning webhook
///
/// Sends `{"workflow": <value>}` as JSON and expects a JSON value back. The
/// workflow is forwarded untouched; its structure is never interpreted here.

use crate::{config::PositioningConfig, positioning::error::PositioningError};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Anything able to position a workflow.
///
/// The submitter only sees this trait so tests can swap in a fake service.
#[async_trait]
pub trait PositioningClient: Send + Sync {
    /// Position `workflow` and return the service's JSON answer
    async fn position(&self, workflow: &Value) -> Result<Value, PositioningError>;
}

/// Request envelope expected by the webhook
#[derive(Debug, Serialize)]
struct PositionRequest<'a> {
    workflow: &'a Value,
}

/// reqwest-backed positioning client
#[derive(Debug, Clone)]
pub struct HttpPositioningClient {
    url: String,
    client: Client,
}

impl HttpPositioningClient {
    /// Build a client with the configured endpoint and timeout
    pub fn new(config: &PositioningConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }

    /// Endpoint this client posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PositioningClient for HttpPositioningClient {
    async fn position(&self, workflow: &Value) -> Result<Value, PositioningError> {
        tracing::debug!("🌍 POST {}", self.url);
        let started = Instant::now();

        // `.json()` sets Content-Type: application/json
        let response = self
            .client
            .post(&self.url)
            .json(&PositionRequest { workflow })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Positioning response status: {} after {:?}", status, started.elapsed());

        if !status.is_success() {
            tracing::warn!("❌ Positioning service returned {}", status);
            return Err(PositioningError::Status(status));
        }

        let body = response.bytes().await?;
        let positioned = serde_json::from_slice::<Value>(&body).map_err(PositioningError::Decode)?;

        tracing::info!(
            "✅ Positioning call completed: {} bytes in {:?}",
            body.len(),
            started.elapsed()
        );

        Ok(positioned)
    }
}
