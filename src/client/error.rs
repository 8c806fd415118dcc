//! Normalized client-side failure.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::upstream::error::field_message;

/// Message used when the proxy could not be reached at all.
pub const NO_RESPONSE: &str = "No response from server. Is the proxy running?";

/// The single failure type every data-layer call returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The proxy answered with an error status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request went out but no response came back.
    #[error("{0}")]
    NoResponse(String),

    /// Anything else: bad URL, undecodable body.
    #[error("{0}")]
    Other(String),
}

/// Result type for data-layer calls.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Build from an error response. Message comes from the body's `error` or
    /// `message` field, else a generic line naming the status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| field_message(&value, &["error", "message"]))
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        Self::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// Classify a reqwest failure from sending or decoding.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_decode() {
            Self::Other(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            tracing::debug!(error = %err, "No response from proxy");
            Self::NoResponse(NO_RESPONSE.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }

    /// Prefix the message, keeping the variant.
    pub fn context(self, prefix: &str) -> Self {
        match self {
            Self::Status { status, message } => Self::Status {
                status,
                message: format!("{}: {}", prefix, message),
            },
            Self::NoResponse(message) => Self::NoResponse(format!("{}: {}", prefix, message)),
            Self::Other(message) => Self::Other(format!("{}: {}", prefix, message)),
        }
    }

    /// HTTP status of the error response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_error_field() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, r#"{"error":"User not found"}"#);
        assert_eq!(
            err,
            ClientError::Status {
                status: 404,
                message: "User not found".into()
            }
        );
    }

    #[test]
    fn test_message_field_is_second_choice() {
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"title is required"}"#);
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn test_generic_message_for_unhelpful_body() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_context_keeps_variant() {
        let err = ClientError::NoResponse(NO_RESPONSE.into()).context("Health check failed");
        assert_eq!(
            err,
            ClientError::NoResponse(format!("Health check failed: {}", NO_RESPONSE))
        );
    }
}
