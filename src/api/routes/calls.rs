use axum::{
    extract::{Path, State},
    Json,
};

use lexdesk_core::models::{Call, User};

use super::parse_id;
use crate::api::{ApiErr, AppState};

const NOT_FOUND: &str = "Call not found";

pub async fn list_calls(State(state): State<AppState>) -> Result<Json<Vec<Call>>, ApiErr> {
    let calls = state
        .storage
        .list_calls()
        .map_err(ApiErr::from_db("list calls"))?;
    Ok(Json(calls))
}

pub async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Call>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .get_call(id)
        .map_err(ApiErr::from_db("get call"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn list_participants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .list_call_participants(id)
        .map_err(ApiErr::from_db("list call participants"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}
