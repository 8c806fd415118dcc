//! Response shaping and error mapping.
//!
//! # Responsibilities
//! - Relay upstream payloads as JSON
//! - Map upstream failures to an outbound status code per route
//! - Produce the `{"error": ...}` body for every failure, middleware ones included
//!
//! # Design Decisions
//! - Mapping branches on the preserved upstream status, not on message text
//! - Transport failures collapse to 500 on data routes
//! - Local errors are logged and answered with a generic message

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::upstream::{UpstreamError, UpstreamReply};

/// Message returned for failures whose details stay server-side.
pub const GENERIC_ERROR: &str = "Something went wrong!";
/// Message returned for unmatched routes.
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error on its way to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 500 with the generic message. The cause is logged, not returned.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Request failed with a local error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
    }

    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND)
    }

    /// Map an upstream failure. Statuses listed in `relayed` reach the caller
    /// unchanged; every other failure becomes 500.
    pub fn from_upstream(err: UpstreamError, relayed: &[StatusCode]) -> Self {
        match err {
            local @ UpstreamError::InvalidRequest(_) => Self::internal(local),
            UpstreamError::Status { status, message } if relayed.contains(&status) => {
                Self::new(status, message)
            }
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }

    /// Replace the message when the status is `status`.
    pub fn with_message_for(mut self, status: StatusCode, message: &str) -> Self {
        if self.status == status {
            self.message = message.to_string();
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// Give non-JSON error responses from the middleware stack (timeouts, body
/// limits) the `{"error": ...}` body every other failure carries.
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    let message = status.canonical_reason().unwrap_or(GENERIC_ERROR).to_string();
    (parts, Json(ErrorBody { error: message })).into_response()
}

/// Relay a successful upstream reply, keeping its status.
pub fn relay(reply: UpstreamReply) -> Response {
    relay_with(reply.status, reply)
}

/// Relay a successful upstream reply under a fixed status.
pub fn relay_with(status: StatusCode, reply: UpstreamReply) -> Response {
    (status, Json(reply.payload.into_json())).into_response()
}
