// Client for the OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::RelayConfig;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 1000;
/// Text sent alongside an image when the user typed nothing.
pub const DEFAULT_IMAGE_PROMPT: &str = "What products do you recommend based on this image?";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode completion response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("completion response contained no message content")]
    EmptyCompletion,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// The image-capable model when an image is attached, the lighter text model otherwise.
pub fn select_model<'a>(cfg: &'a RelayConfig, has_image: bool) -> &'a str {
    if has_image {
        &cfg.vision_model
    } else {
        &cfg.text_model
    }
}

/// Builds the two-message exchange: system instruction, then one user turn.
pub fn build_completion_request(
    cfg: &RelayConfig,
    system_prompt: &str,
    text: Option<&str>,
    image: Option<&str>,
) -> CompletionRequest {
    let user_content = match image {
        Some(url) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: text.unwrap_or(DEFAULT_IMAGE_PROMPT).to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: url.to_string(),
                },
            },
        ]),
        None => MessageContent::Text(text.unwrap_or_default().to_string()),
    };

    CompletionRequest {
        model: select_model(cfg, image.is_some()).to_string(),
        messages: vec![
            CompletionMessage {
                role: "system",
                content: MessageContent::Text(system_prompt.to_string()),
            },
            CompletionMessage {
                role: "user",
                content: user_content,
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(cfg: &RelayConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends one completion request and returns the first choice's text verbatim.
    #[instrument(skip_all, fields(model = %request.model))]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        let url = self.completions_url();
        debug!(
            message_count = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| UpstreamError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            warn!(%status, body_len = body.len(), "Completion API returned non-success status");
            return Err(UpstreamError::Status { status, body });
        }

        let parsed: CompletionResponse = response.json().await.map_err(UpstreamError::Decode)?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(UpstreamError::EmptyCompletion)?;

        debug!(reply_len = reply.len(), "Received completion");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg() -> RelayConfig {
        RelayConfig {
            api_key: "k".to_string(),
            ..RelayConfig::default()
        }
    }

    #[test]
    fn test_model_follows_image_presence() {
        let cfg = cfg();
        assert_eq!(select_model(&cfg, true), "gpt-4o");
        assert_eq!(select_model(&cfg, false), "gpt-4o-mini");
    }

    #[test]
    fn test_text_only_request_uses_plain_content() {
        let req = build_completion_request(&cfg(), "SYS", Some("Recommend a tee"), None);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "SYS"},
                    {"role": "user", "content": "Recommend a tee"}
                ],
                "temperature": 0.7,
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn test_image_request_uses_multipart_content() {
        let req = build_completion_request(
            &cfg(),
            "SYS",
            Some("Like this?"),
            Some("data:image/png;base64,AAAA"),
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(
            value["messages"][1]["content"],
            json!([
                {"type": "text", "text": "Like this?"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
            ])
        );
    }

    #[test]
    fn test_image_without_text_gets_default_prompt() {
        let req = build_completion_request(&cfg(), "SYS", None, Some("data:image/png;base64,AAAA"));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["messages"][1]["content"][0]["text"], DEFAULT_IMAGE_PROMPT);
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let client = CompletionClient::new(&RelayConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            ..cfg()
        })
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }
}
