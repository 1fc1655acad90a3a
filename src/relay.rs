//! Wire contract and HTTP client for the relay endpoint.
//!
//! The envelope shape (`{success, data}` / `{success, error}`) is the one
//! contract the widget depends on; everything upstream of the relay is
//! treated as an opaque black box.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::RelayError;

/// One outgoing chat message plus the optional locale hint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Opaque anti-forgery token, passed through unmodified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// The uniform success/failure envelope returned by the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayEnvelope {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(reply.into()),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Collapse the envelope into the result the controller consumes
    pub fn into_result(self) -> RelayResult {
        if self.success {
            match self.data {
                Some(reply) => Ok(reply),
                None => Err(RelayError::Upstream(
                    "success envelope with no data field".to_string(),
                )),
            }
        } else {
            Err(RelayError::Upstream(
                self.error.unwrap_or_else(|| "unspecified error".to_string()),
            ))
        }
    }
}

pub type RelayResult = Result<String, RelayError>;

/// Transport seam between the widget controller and the relay endpoint
#[async_trait]
pub trait Relay: Send + Sync {
    async fn send(&self, request: RelayRequest) -> RelayResult;
}

#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    url: String,
}

impl RelayClient {
    /// Timeout covers the whole round trip; the relay itself bounds the
    /// upstream call, so this only has to be a little more generous.
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Relay for RelayClient {
    async fn send(&self, request: RelayRequest) -> RelayResult {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::Upstream("relay request timed out".to_string())
                } else {
                    RelayError::Upstream(format!("relay unreachable: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(RelayError::Upstream(format!(
                "relay returned status {}",
                response.status()
            )));
        }

        let envelope: RelayEnvelope = response
            .json()
            .await
            .map_err(|e| RelayError::Upstream(format!("malformed relay response: {}", e)))?;

        envelope.into_result()
    }
}
