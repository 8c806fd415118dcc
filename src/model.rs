//! Entity shapes exchanged between the proxy, the upstream and clients.
//!
//! The proxy relays users, tasks and stats as opaque JSON. Only
//! [`HealthReport`] is built by the proxy itself; the typed records below are
//! what the client side decodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health status reported by the proxy's `/health` route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub message: String,
    /// The upstream's own health payload, present when the probe succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_health: Option<Value>,
    /// Why the probe failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn ok(upstream_health: Value) -> Self {
        Self {
            status: "ok".to_string(),
            message: "Proxy is running".to_string(),
            upstream_health: Some(upstream_health),
            error: None,
        }
    }

    pub fn upstream_unavailable(error: String) -> Self {
        Self {
            status: "error".to_string(),
            message: "Proxy is running but the upstream service is unavailable".to_string(),
            upstream_health: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub user_id: i64,
}

/// Envelope of `GET /api/users`. A missing list reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub count: usize,
}

/// Envelope of `GET /api/tasks`. A missing list reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
}

/// Aggregate counts from `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub users: UserStats,
    pub tasks: TaskStats,
}

/// Optional filters for task listings. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl TaskFilter {
    pub fn new(status: Option<&str>, user_id: Option<&str>) -> Self {
        Self {
            status: status.map(str::to_string),
            user_id: user_id.map(str::to_string),
        }
    }

    /// Query pairs to send, in `status`, `userId` order, skipping empty values.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [("status", &self.status), ("userId", &self.user_id)]
            .into_iter()
            .filter_map(|(key, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((key, v)),
                _ => None,
            })
            .collect()
    }
}
