//! HTTP client for the upstream service.
//!
//! # Responsibilities
//! - Resolve request paths against the configured base URL
//! - Serialize JSON bodies and send them
//! - Classify the outcome: reply, status failure, transport failure
//! - Enforce connect and total deadlines on every call

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;
use url::Url;

use crate::config::ProxyConfig;
use crate::observability::metrics;
use crate::upstream::error::{describe, UpstreamError, UpstreamResult};
use crate::upstream::request::{Payload, UpstreamReply, UpstreamRequest};

/// Port through which handlers reach the upstream service.
pub trait Upstream: Send + Sync + 'static {
    /// Send one request and classify the outcome.
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, UpstreamResult<UpstreamReply>>;
}

/// Shared handle to an upstream implementation.
pub type SharedUpstream = Arc<dyn Upstream>;

/// Upstream reached over plain HTTP with a pooled hyper client.
#[derive(Clone)]
pub struct HttpUpstream {
    base_url: Url,
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_response_bytes: usize,
}

impl HttpUpstream {
    /// Create a client from validated configuration.
    pub fn from_config(config: &ProxyConfig) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.upstream.base_url).map_err(|e| {
            UpstreamError::InvalidRequest(format!(
                "invalid upstream URL '{}': {}",
                config.upstream.base_url, e
            ))
        })?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            base_url,
            client,
            timeout: Duration::from_secs(config.timeouts.upstream_secs),
            max_response_bytes: config.upstream.max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build(&self, request: &UpstreamRequest) -> UpstreamResult<Request<Body>> {
        let url = request.target(&self.base_url)?;

        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(url.as_str())
            .header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let body = match &request.body {
            Some(value) => Body::from(
                serde_json::to_vec(value).map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?,
            ),
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))
    }

    async fn read(&self, response: Response<Incoming>) -> UpstreamResult<UpstreamReply> {
        let status = response.status();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), self.max_response_bytes)
            .await
            .map_err(|e| UpstreamError::Transport(format!("failed to read upstream body: {}", describe(&e))))?;

        if status.is_success() {
            Ok(UpstreamReply {
                status,
                payload: Payload::parse(&bytes),
            })
        } else {
            Err(UpstreamError::from_response(status, &String::from_utf8_lossy(&bytes)))
        }
    }

    async fn call(&self, request: UpstreamRequest) -> UpstreamResult<UpstreamReply> {
        let outbound = self.build(&request)?;

        let response = match time::timeout(self.timeout, self.client.request(outbound)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(UpstreamError::Transport(describe(&e))),
            Err(_) => return Err(UpstreamError::Timeout(self.timeout.as_secs())),
        };

        self.read(response).await
    }
}

impl Upstream for HttpUpstream {
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, UpstreamResult<UpstreamReply>> {
        Box::pin(async move {
            let method = request.method.clone();
            let target = request.path_and_query();
            tracing::debug!(method = %method, target = %target, "Forwarding to upstream");

            let result = self.call(request).await;
            if let Err(e) = &result {
                if e.is_transport() {
                    tracing::error!(method = %method, target = %target, error = %e, "Upstream unreachable");
                } else {
                    tracing::warn!(
                        method = %method,
                        target = %target,
                        status = ?e.status(),
                        error = %e,
                        "Upstream call failed"
                    );
                }
                metrics::record_upstream_failure(e.kind());
            }
            result
        })
    }
}
