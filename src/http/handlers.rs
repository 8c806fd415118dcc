//! Route handlers.
//!
//! Every handler has the same shape: validate input, build one
//! `UpstreamRequest`, send it, and map the reply or failure to a response.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::http::request::ForwardedRequestId;
use crate::http::response::{relay, relay_with, ApiError};
use crate::http::server::AppState;
use crate::model::{HealthReport, TaskFilter};
use crate::upstream::request::is_dot_segment;
use crate::upstream::{UpstreamError, UpstreamReply, UpstreamRequest};

const USERS: &str = "/api/users";
const TASKS: &str = "/api/tasks";
const STATS: &str = "/api/stats";

const RELAY_NONE: &[StatusCode] = &[];
const RELAY_NOT_FOUND: &[StatusCode] = &[StatusCode::NOT_FOUND];
const RELAY_BAD_REQUEST: &[StatusCode] = &[StatusCode::BAD_REQUEST];
const RELAY_NOT_FOUND_OR_BAD_REQUEST: &[StatusCode] = &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST];

async fn forward(
    state: &AppState,
    request_id: &ForwardedRequestId,
    request: UpstreamRequest,
    relayed: &[StatusCode],
) -> Result<UpstreamReply, ApiError> {
    state
        .upstream
        .send(request_id.attach(request))
        .await
        .map_err(|e| ApiError::from_upstream(e, relayed))
}

/// Path ids name one resource; `.` and `..` would resolve to another route.
fn resource_id(id: String) -> Result<String, ApiError> {
    if is_dot_segment(&id) {
        return Err(ApiError::route_not_found());
    }
    Ok(id)
}

/// `GET /health`: proxy liveness plus an upstream probe.
pub async fn health(State(state): State<AppState>, request_id: ForwardedRequestId) -> Response {
    let probe = request_id.attach(UpstreamRequest::get(&state.config.upstream.health_path));

    match state.upstream.send(probe).await {
        Ok(reply) => (StatusCode::OK, Json(HealthReport::ok(reply.payload.into_json()))).into_response(),
        Err(e) => {
            let reason = match e {
                local @ UpstreamError::InvalidRequest(_) => ApiError::internal(local).message,
                other => {
                    tracing::warn!(request_id = %request_id.as_str(), error = %other, "Upstream health probe failed");
                    other.to_string()
                }
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport::upstream_unavailable(reason)),
            )
                .into_response()
        }
    }
}

/// `GET /api/users`
pub async fn list_users(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
) -> Result<Response, ApiError> {
    let reply = forward(&state, &request_id, UpstreamRequest::get(USERS), RELAY_NONE).await?;
    Ok(relay(reply))
}

/// `GET /api/users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = resource_id(id)?;
    let reply = forward(&state, &request_id, UpstreamRequest::get(USERS).segment(id), RELAY_NOT_FOUND)
        .await
        .map_err(|e| e.with_message_for(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(relay(reply))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let reply = forward(&state, &request_id, UpstreamRequest::post(USERS, body), RELAY_BAD_REQUEST).await?;
    Ok(relay_with(StatusCode::CREATED, reply))
}

/// `GET /api/tasks?status=&userId=`
pub async fn list_tasks(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
    filter: Result<Query<TaskFilter>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(filter) = filter?;
    let request = filter
        .pairs()
        .into_iter()
        .fold(UpstreamRequest::get(TASKS), |request, (key, value)| request.query(key, value));

    let reply = forward(&state, &request_id, request, RELAY_NONE).await?;
    Ok(relay(reply))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = resource_id(id)?;
    let reply = forward(&state, &request_id, UpstreamRequest::get(TASKS).segment(id), RELAY_NOT_FOUND)
        .await
        .map_err(|e| e.with_message_for(StatusCode::NOT_FOUND, "Task not found"))?;
    Ok(relay(reply))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let reply = forward(&state, &request_id, UpstreamRequest::post(TASKS, body), RELAY_BAD_REQUEST).await?;
    Ok(relay_with(StatusCode::CREATED, reply))
}

/// `PUT /api/tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = resource_id(id)?;
    let Json(body) = body?;
    let request = UpstreamRequest::put(TASKS, body).segment(id);
    let reply = forward(&state, &request_id, request, RELAY_NOT_FOUND_OR_BAD_REQUEST).await?;
    Ok(relay(reply))
}

/// `GET /api/stats`
pub async fn get_stats(
    State(state): State<AppState>,
    request_id: ForwardedRequestId,
) -> Result<Response, ApiError> {
    let reply = forward(&state, &request_id, UpstreamRequest::get(STATS), RELAY_NONE).await?;
    Ok(relay(reply))
}

/// Fallback for unknown paths and undeclared methods.
pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
