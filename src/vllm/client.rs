use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::vllm::types::{ChatCompletionRequest, ChatCompletionResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to inference backend failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode inference response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin wrapper around the backend's chat-completions endpoint. One request
/// per call, no retries, no timeout beyond reqwest's defaults; the inner
/// client and its connection pool are shared across all in-flight requests.
pub struct VllmClient {
    base_url: String,
    client: Client,
}

impl VllmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        VllmClient {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ClientError> {
        let url = completions_url(&self.base_url);
        debug!("sending chat completion request to {}", url);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
}
