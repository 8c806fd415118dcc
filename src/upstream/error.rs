//! Upstream failure taxonomy and error-body message extraction.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Fields checked, in order, for a human-readable message in an error body.
const MESSAGE_FIELDS: [&str; 3] = ["error", "message", "detail"];

/// Errors that can occur while calling the upstream service.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// No response was received (connect refused, reset, unreadable body).
    #[error("{0}")]
    Transport(String),

    /// The upstream did not answer before the deadline.
    #[error("upstream did not respond within {0} seconds")]
    Timeout(u64),

    /// The upstream answered with a non-2xx status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The outbound request could not be built. A local bug, not an upstream fault.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    /// Build a status failure from the raw error body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("upstream error").to_string()
            } else {
                body.to_string()
            }
        });
        Self::Status { status, message }
    }

    /// The upstream's status code, when it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response came back.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Pull a message out of a JSON error body, if it has one.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    field_message(&value, &MESSAGE_FIELDS)
}

/// First present, non-empty field among `fields` rendered as text.
pub fn field_message(value: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match value.get(*field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        other => Some(other.to_string()),
    })
}

/// Render an error with its whole source chain.
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
