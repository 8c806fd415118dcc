//! Request identification.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID for requests that arrive without one
//! - Echo the ID on the response
//! - Hand the ID to handlers so it reaches the upstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied `x-request-id` is kept, not replaced

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, HeaderValue, Request},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::upstream::UpstreamRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The inbound request ID, if any, for forwarding upstream.
#[derive(Debug, Clone, Default)]
pub struct ForwardedRequestId(pub Option<HeaderValue>);

impl<S> FromRequestParts<S> for ForwardedRequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.headers.get(X_REQUEST_ID).cloned()))
    }
}

impl ForwardedRequestId {
    /// Copy the ID onto an outbound upstream request.
    pub fn attach(&self, request: UpstreamRequest) -> UpstreamRequest {
        match &self.0 {
            Some(id) => request.header(X_REQUEST_ID, id.clone()),
            None => request,
        }
    }

    /// The ID as text, or `"unknown"` for logs.
    pub fn as_str(&self) -> &str {
        self.0
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}
