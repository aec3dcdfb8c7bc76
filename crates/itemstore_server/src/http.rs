//! HTTP endpoint handlers

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use itemstore_core::{
    core_version, HealthReport, Item, ItemPatch, NewItem, NewTask, RecordId, StoreResult, Task,
    TaskPatch,
};
use log::{error, info, warn};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

type SharedState = State<Arc<AppState>>;

/// Welcome message with the service version
pub async fn home() -> Json<Value> {
    info!("event=home module=http status=ok");
    Json(json!({
        "message": "Welcome to the itemstore API!",
        "version": core_version(),
    }))
}

/// Health check backed by a read-only store probe
pub async fn health(State(state): SharedState) -> (StatusCode, Json<Value>) {
    match state.store.probe() {
        HealthReport::Healthy => {
            info!("event=health_check module=http status=ok");
            (
                StatusCode::OK,
                Json(json!({ "status": "healthy", "database": "connected" })),
            )
        }
        HealthReport::Unhealthy { error: detail } => {
            error!("event=health_check module=http status=error error={detail}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "error": detail,
                })),
            )
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found(request: Request) -> ApiError {
    warn!(
        "event=route_not_found module=http status=not_found path={}",
        request.uri().path()
    );
    ApiError::not_found("Resource not found")
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed(request: Request) -> ApiError {
    warn!(
        "event=method_not_allowed module=http status=rejected method={} path={}",
        request.method(),
        request.uri().path()
    );
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Converts a handler panic into a generic JSON 500.
///
/// A panic unwinds out of the unit of work, so the open transaction is
/// dropped and rolled back before this runs.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!(
        "event=handler_panic module=http status=error payload={}",
        detail.replace(['\n', '\r'], " ")
    );
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred",
    )
    .into_response()
}

// --- Items ---

/// Create an item
pub async fn create_item(
    State(state): SharedState,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let input = json_body(payload, "item_create", "Name is required")?;
    let item = state
        .store
        .create_item(input)
        .map_err(|err| ApiError::from_store(err, "item_create", "Failed to create item"))?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// List all items
pub async fn list_items(State(state): SharedState) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state
        .store
        .list_items()
        .map_err(|err| ApiError::from_store(err, "item_list", "Failed to list items"))?;
    info!("event=item_list module=http status=ok count={}", items.len());
    Ok(Json(items))
}

/// Get one item
pub async fn get_item(
    State(state): SharedState,
    Path(raw_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&raw_id)?;
    let item = state
        .store
        .get_item(id)
        .map_err(|err| ApiError::from_store(err, "item_get", "Failed to load item"))?;
    Ok(Json(item))
}

/// Partially update an item
pub async fn update_item(
    State(state): SharedState,
    Path(raw_id): Path<String>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&raw_id)?;
    let patch = match json_body(payload, "item_update", "No data provided for update") {
        Ok(patch) => patch,
        Err(rejected) => {
            // A missing record wins over a bad payload.
            ensure_exists(state.store.get_item(id), "item_update")?;
            return Err(rejected);
        }
    };
    let item = state
        .store
        .update_item(id, patch)
        .map_err(|err| ApiError::from_store(err, "item_update", "Failed to update item"))?;
    Ok(Json(item))
}

/// Delete an item
pub async fn delete_item(
    State(state): SharedState,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .store
        .delete_item(id)
        .map_err(|err| ApiError::from_store(err, "item_delete", "Failed to delete item"))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Tasks ---

/// Create a task
pub async fn create_task(
    State(state): SharedState,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = json_body(payload, "task_create", "Description is required")?;
    let task = state
        .store
        .create_task(input)
        .map_err(|err| ApiError::from_store(err, "task_create", "Failed to create task"))?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks, newest first
pub async fn list_tasks(State(state): SharedState) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .store
        .list_tasks()
        .map_err(|err| ApiError::from_store(err, "task_list", "Failed to list tasks"))?;
    info!("event=task_list module=http status=ok count={}", tasks.len());
    Ok(Json(tasks))
}

/// Get one task
pub async fn get_task(
    State(state): SharedState,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    let task = state
        .store
        .get_task(id)
        .map_err(|err| ApiError::from_store(err, "task_get", "Failed to load task"))?;
    Ok(Json(task))
}

/// Partially update a task
pub async fn update_task(
    State(state): SharedState,
    Path(raw_id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    let patch = match json_body(payload, "task_update", "No data provided for update") {
        Ok(patch) => patch,
        Err(rejected) => {
            ensure_exists(state.store.get_task(id), "task_update")?;
            return Err(rejected);
        }
    };
    let task = state
        .store
        .update_task(id, patch)
        .map_err(|err| ApiError::from_store(err, "task_update", "Failed to update task"))?;
    Ok(Json(task))
}

/// Mark a task as completed
pub async fn complete_task(
    State(state): SharedState,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id)?;
    let task = state
        .store
        .complete_task(id)
        .map_err(|err| ApiError::from_store(err, "task_complete", "Failed to complete task"))?;
    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): SharedState,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .store
        .delete_task(id)
        .map_err(|err| ApiError::from_store(err, "task_delete", "Failed to delete task"))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Middleware ---

/// Logs one line per request with status and latency
pub async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

// --- Helpers ---

/// Non-integer ids cannot name a record, so they are reported as 404.
fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse::<RecordId>()
        .map_err(|_| ApiError::not_found("Resource not found"))
}

fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    operation: &str,
    missing_message: &str,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::JsonDataError(err)) => {
            warn!("event={operation} module=http status=rejected reason={err}");
            Err(ApiError::bad_request(err.body_text()))
        }
        Err(rejection) => {
            warn!(
                "event={operation} module=http status=rejected reason={}",
                rejection.body_text()
            );
            Err(ApiError::bad_request(missing_message))
        }
    }
}

fn ensure_exists<T>(lookup: StoreResult<T>, operation: &str) -> Result<(), ApiError> {
    lookup
        .map(|_| ())
        .map_err(|err| ApiError::from_store(err, operation, "Failed to load record"))
}
