use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use tasknest_shared::routes::{HEALTH, TASK_COMPLETE_PATTERN, TASK_PATTERN, TASKS_PATTERN};
use tasknest_shared::{TaskCreate, TaskDto, TaskId, TaskPatch};
use tracing::{info, instrument};

use crate::datastore::TaskStore;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
}

pub fn router(store: Arc<TaskStore>) -> Router {
    Router::new()
        .route(HEALTH, get(health))
        .route(TASKS_PATTERN, get(list_tasks).post(create_task))
        .route(
            TASK_PATTERN,
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route(TASK_COMPLETE_PATTERN, patch(toggle_completion))
        .with_state(AppState { store })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip(state))]
async fn list_tasks(State(state): State<AppState>) -> Json<Vec<TaskDto>> {
    let tasks = state.store.list();
    info!(count = tasks.len(), "listed tasks");
    Json(tasks)
}

#[instrument(skip(state, input), fields(title_len = input.title.len(), tag_count = input.tags.len()))]
async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskDto>), ApiError> {
    let task = state.store.create(input, Utc::now())?;
    info!(id = %task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state))]
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskDto>, ApiError> {
    let id = TaskId::from(id);
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[instrument(skip(state, patch))]
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskDto>, ApiError> {
    let task = state.store.update(&TaskId::from(id), patch)?;
    info!(id = %task.id, "updated task");
    Ok(Json(task))
}

#[instrument(skip(state))]
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&TaskId::from(id))?;
    info!("deleted task");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn toggle_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskDto>, ApiError> {
    let task = state.store.toggle_completion(&TaskId::from(id))?;
    info!(id = %task.id, completed = task.completed, "toggled task completion");
    Ok(Json(task))
}
