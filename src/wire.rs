// JSON bodies exchanged between the chat client and the relay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`. At least one of `message` or `image` must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Image encoded as a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatRequest {
    /// Text of the request, treating an empty string as absent.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|i| !i.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.image().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub products: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings_count_as_absent() {
        let req = ChatRequest {
            message: Some(String::new()),
            image: Some(String::new()),
        };
        assert!(req.is_empty());
        assert!(req.text().is_none());
        assert!(req.image().is_none());
    }

    #[test]
    fn test_whitespace_message_is_present() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"  "}"#).unwrap();
        assert!(!req.is_empty());
    }

    #[test]
    fn test_missing_fields_deserialize_to_none() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, ChatRequest::default());
        assert!(req.is_empty());
    }

    #[test]
    fn test_request_omits_absent_fields() {
        let req = ChatRequest {
            message: Some("hi".to_string()),
            image: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"hi"}"#);
    }
}
