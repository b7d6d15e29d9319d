use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::wire::{ChatRequest, ChatResponse};

/// HTTP transport from the chat client to the relay's `POST /chat`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    chat_url: String,
}

impl RelayClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to initialize HTTP client")?;
        Ok(Self {
            client,
            chat_url: cfg.chat_url(),
        })
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(
            chat_url = %self.chat_url,
            has_image = request.image.is_some(),
            "Sending chat request to relay"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .context(format!("Failed to send request to relay at {}", self.chat_url))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Relay returned non-success status");
            return Err(anyhow!("Failed to get response: relay returned {}", status));
        }

        response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse JSON response from relay")
    }
}
