use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use lexdesk_core::models::{InsertTask, Task};

use super::{parse_body, parse_id};
use crate::api::{ApiErr, AppState};

const NOT_FOUND: &str = "Task not found";
const INVALID: &str = "Invalid task data";

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiErr> {
    let tasks = state
        .storage
        .list_tasks()
        .map_err(ApiErr::from_db("list tasks"))?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .get_task(id)
        .map_err(ApiErr::from_db("get task"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiErr> {
    let input: InsertTask = parse_body(&body, INVALID)?;
    let task = state
        .storage
        .create_task(input)
        .map_err(ApiErr::from_db("create task"))?;
    tracing::info!(task_id = task.id, "Created task");
    Ok((StatusCode::CREATED, Json(task)))
}
