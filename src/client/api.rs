//! Typed client for the proxy's REST surface.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::client::error::{ClientError, ClientResult};
use crate::model::{HealthReport, Stats, Task, TaskFilter, TaskList, User, UserList};

/// Proxy address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the proxy. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Other(format!("invalid API URL '{}': {}", base_url, e)))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Other(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| ClientError::Other(format!("API URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        tracing::debug!(method = %method, path = %url.path(), "Making request");
        Ok(self.http.request(method, url))
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(ClientError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }

        response.json::<T>().await.map_err(ClientError::from_reqwest)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> ClientResult<T> {
        let mut builder = self.request(Method::GET, segments)?;
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.execute(builder).await
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, segments)?.json(body);
        self.execute(builder).await
    }

    /// `GET /health`
    pub async fn check_health(&self) -> ClientResult<HealthReport> {
        self.get(&["health"], &[])
            .await
            .map_err(|e| e.context("Health check failed"))
    }

    /// `GET /api/users`
    pub async fn get_users(&self) -> ClientResult<UserList> {
        self.get(&["api", "users"], &[]).await
    }

    /// `GET /api/users/{id}`
    pub async fn get_user_by_id(&self, id: i64) -> ClientResult<User> {
        self.get(&["api", "users", id.to_string().as_str()], &[]).await
    }

    /// `GET /api/tasks`, with only the non-empty filters sent.
    pub async fn get_tasks(&self, filter: &TaskFilter) -> ClientResult<TaskList> {
        self.get(&["api", "tasks"], &filter.pairs()).await
    }

    /// `GET /api/tasks/{id}`
    pub async fn get_task_by_id(&self, id: i64) -> ClientResult<Task> {
        self.get(&["api", "tasks", id.to_string().as_str()], &[]).await
    }

    /// `GET /api/stats`
    pub async fn get_stats(&self) -> ClientResult<Stats> {
        self.get(&["api", "stats"], &[]).await
    }

    /// `POST /api/users`
    pub async fn create_user(&self, user: &Value) -> ClientResult<Value> {
        self.send_json(Method::POST, &["api", "users"], user).await
    }

    /// `POST /api/tasks`
    pub async fn create_task(&self, task: &Value) -> ClientResult<Value> {
        self.send_json(Method::POST, &["api", "tasks"], task).await
    }

    /// `PUT /api/tasks/{id}`
    pub async fn update_task(&self, id: i64, changes: &Value) -> ClientResult<Value> {
        self.send_json(Method::PUT, &["api", "tasks", id.to_string().as_str()], changes).await
    }
}
