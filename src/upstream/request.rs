//! Outbound request description and upstream replies.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::upstream::error::{UpstreamError, UpstreamResult};

/// A single call to the upstream service, independent of transport.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl UpstreamRequest {
    /// Create a request for a fixed path such as `/api/users`.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str, body: Value) -> Self {
        Self::new(Method::POST, path).json(body)
    }

    pub fn put(path: &str, body: Value) -> Self {
        Self::new(Method::PUT, path).json(body)
    }

    /// Append one path segment taken from caller input. It is encoded on its
    /// own, so `/` or `?` inside it never change the target route. Dot
    /// segments are refused by [`target`](Self::target).
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append a query pair.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Path and query as the upstream will see them, for logging.
    pub fn path_and_query(&self) -> String {
        let base = Url::parse("http://upstream/").ok();
        match base.and_then(|b| self.target(&b).ok()) {
            Some(url) => match url.query() {
                Some(q) => format!("{}?{}", url.path(), q),
                None => url.path().to_string(),
            },
            None => format!("/{}", self.segments.join("/")),
        }
    }

    /// Resolve this request against the upstream base URL.
    pub fn target(&self, base: &Url) -> UpstreamResult<Url> {
        // The URL encoder drops `.` and `..` instead of escaping them.
        if let Some(dot) = self.segments.iter().find(|s| is_dot_segment(s)) {
            return Err(UpstreamError::InvalidRequest(format!(
                "path segment '{}' would change the target route",
                dot
            )));
        }

        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidRequest(format!("base URL '{}' cannot hold a path", base)))?
            .clear()
            .extend(&self.segments);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// True for `.` and `..`, which resolve away instead of naming a resource.
pub fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Body of a successful upstream reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body parsed as JSON.
    Json(Value),
    /// Body that was not JSON, kept verbatim.
    Text(String),
}

impl Payload {
    /// Parse `bytes` as JSON, keeping the raw text when that fails.
    pub fn parse(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// JSON view of the payload; text becomes a JSON string.
    pub fn into_json(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }
}

/// A 2xx reply from the upstream.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub payload: Payload,
}
