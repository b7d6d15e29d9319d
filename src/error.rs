use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;
use crate::wire::ErrorResponse;

/// Failures surfaced at the relay's request boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Message or image required")]
    Validation,
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation | RelayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RelayError::Upstream(e) => {
                error!("Chat error: {}", e);
                ErrorResponse {
                    error: "Failed to process request".to_string(),
                    details: Some(e.to_string()),
                }
            }
            other => ErrorResponse {
                error: other.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::MalformedBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::from(UpstreamError::EmptyCompletion).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message() {
        assert_eq!(RelayError::Validation.to_string(), "Message or image required");
    }
}
