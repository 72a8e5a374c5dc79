use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Duration;

use crate::config::Config;

/// Request body of the agent chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub user_id: String,
    pub chat_id: String,
    pub message: String,
}

/// Response body of the agent chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl AgentReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: None,
            chat_id: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("request failed with status {0}")]
    Status(u16),
    #[error("response invalid: {0}")]
    InvalidResponse(String),
}

/// Pending result of [`AgentTransport::chat`]
pub type ChatFuture<'a> = BoxFuture<'a, Result<AgentReply, TransportError>>;

/// One round trip to the remote agent
pub trait AgentTransport: Send + Sync {
    fn chat<'a>(&'a self, payload: &'a ChatPayload) -> ChatFuture<'a>;
}

/// Agent transport over `POST {api_url}/v1/chat`
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            endpoint: format!("{}/v1/chat", api_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, payload: &ChatPayload) -> Result<AgentReply, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(TransportError::Network)?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(body = %body, "unexpected agent response body");
            TransportError::InvalidResponse(e.to_string())
        })
    }
}

impl AgentTransport for HttpTransport {
    fn chat<'a>(&'a self, payload: &'a ChatPayload) -> ChatFuture<'a> {
        self.post(payload).boxed()
    }
}
