//! Shared utilities for integration tests: an in-memory task service and a
//! proxy wired to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use task_proxy::config::ProxyConfig;
use task_proxy::http::HttpServer;
use task_proxy::lifecycle::Shutdown;
use task_proxy::upstream::HttpUpstream;

/// Requests seen by the mock service, as `"METHOD /path?query"`.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }
}

#[derive(Clone)]
struct MockState {
    users: Arc<Mutex<Vec<Value>>>,
    tasks: Arc<Mutex<Vec<Value>>>,
}

/// A running mock of the task service.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub log: RequestLog,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn seed_users() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "John Doe", "email": "john@example.com", "role": "developer"}),
        json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "role": "designer"}),
        json!({"id": 3, "name": "Bob Johnson", "email": "bob@example.com", "role": "manager"}),
    ]
}

fn seed_tasks() -> Vec<Value> {
    vec![
        json!({"id": 1, "title": "Implement authentication", "status": "pending", "userId": 1}),
        json!({"id": 2, "title": "Design user interface", "status": "in-progress", "userId": 2}),
        json!({"id": 3, "title": "Write API documentation", "status": "completed", "userId": 1}),
    ]
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("{} not found", what)}))).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    log.0
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri()));
    next.run(request).await
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_users(State(state): State<MockState>) -> Json<Value> {
    let users = state.users.lock().unwrap().clone();
    Json(json!({"count": users.len(), "users": users}))
}

async fn get_user(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let users = state.users.lock().unwrap();
    match users.iter().find(|u| u["id"].to_string() == id) {
        Some(user) => Json(user.clone()).into_response(),
        None => not_found("User"),
    }
}

async fn create_user(State(state): State<MockState>, Json(mut body): Json<Value>) -> Response {
    if body["name"].as_str().unwrap_or_default().is_empty() {
        return bad_request("name is required");
    }
    let mut users = state.users.lock().unwrap();
    body["id"] = json!(users.len() + 1);
    users.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

#[derive(Deserialize)]
struct TaskQuery {
    status: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn list_tasks(State(state): State<MockState>, Query(query): Query<TaskQuery>) -> Json<Value> {
    let tasks: Vec<Value> = state
        .tasks
        .lock()
        .unwrap()
        .iter()
        .filter(|t| query.status.as_deref().map_or(true, |s| t["status"] == s))
        .filter(|t| query.user_id.as_deref().map_or(true, |u| t["userId"].to_string() == u))
        .cloned()
        .collect();
    Json(json!({"count": tasks.len(), "tasks": tasks}))
}

async fn get_task(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let tasks = state.tasks.lock().unwrap();
    match tasks.iter().find(|t| t["id"].to_string() == id) {
        Some(task) => Json(task.clone()).into_response(),
        None => not_found("Task"),
    }
}

async fn create_task(State(state): State<MockState>, Json(mut body): Json<Value>) -> Response {
    if body["title"].as_str().unwrap_or_default().is_empty() {
        return bad_request("title is required");
    }
    let mut tasks = state.tasks.lock().unwrap();
    body["id"] = json!(tasks.len() + 1);
    if body.get("status").is_none() {
        body["status"] = json!("pending");
    }
    tasks.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_task(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> Response {
    let mut tasks = state.tasks.lock().unwrap();
    let Some(task) = tasks.iter_mut().find(|t| t["id"].to_string() == id) else {
        return not_found("Task");
    };
    if let (Some(task), Some(changes)) = (task.as_object_mut(), changes.as_object()) {
        for (key, value) in changes {
            task.insert(key.clone(), value.clone());
        }
    }
    Json(task.clone()).into_response()
}

async fn stats(State(state): State<MockState>) -> Json<Value> {
    let users = state.users.lock().unwrap().len();
    let tasks = state.tasks.lock().unwrap();
    let count = |status: &str| tasks.iter().filter(|t| t["status"] == status).count();
    Json(json!({
        "users": {"total": users},
        "tasks": {
            "total": tasks.len(),
            "pending": count("pending"),
            "inProgress": count("in-progress"),
            "completed": count("completed"),
        }
    }))
}

/// Start the mock task service on an ephemeral port.
pub async fn start_mock_upstream() -> MockUpstream {
    let state = MockState {
        users: Arc::new(Mutex::new(seed_users())),
        tasks: Arc::new(Mutex::new(seed_tasks())),
    };
    let log = RequestLog::default();

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", get(get_user))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", get(get_task).put(update_task))
        .route("/api/stats", get(stats))
        .route("/text", get(|| async { "pong" }))
        .route(
            "/detail-error",
            get(|| async { (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "bad input"}))) }),
        )
        .route("/empty-error", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        )
        .with_state(state)
        .layer(middleware::from_fn_with_state(log.clone(), record));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, log }
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Proxy configuration pointing at `upstream_url`, with short deadlines.
pub fn proxy_config(upstream_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream_url.to_string();
    config.timeouts.connect_secs = 1;
    config.timeouts.upstream_secs = 1;
    config.timeouts.request_secs = 5;
    config
}

/// Start the proxy in front of `upstream_url`. Trigger the returned
/// [`Shutdown`] to stop it.
pub async fn start_proxy(upstream_url: &str) -> (SocketAddr, Shutdown) {
    let config = proxy_config(upstream_url);
    let upstream = Arc::new(HttpUpstream::from_config(&config).unwrap());

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, upstream);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
