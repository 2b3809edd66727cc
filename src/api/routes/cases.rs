use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use lexdesk_core::models::{Case, CaseAssignment, InsertCase, InsertCaseAssignment, User};

use super::{parse_body, parse_id};
use crate::api::{ApiErr, AppState};

const NOT_FOUND: &str = "Case not found";
const INVALID: &str = "Invalid case data";
const INVALID_ASSIGNMENT: &str = "Invalid assignment data";

pub async fn list_cases(State(state): State<AppState>) -> Result<Json<Vec<Case>>, ApiErr> {
    let cases = state
        .storage
        .list_cases()
        .map_err(ApiErr::from_db("list cases"))?;
    Ok(Json(cases))
}

pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Case>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .get_case(id)
        .map_err(ApiErr::from_db("get case"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn create_case(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Case>), ApiErr> {
    let input: InsertCase = parse_body(&body, INVALID)?;
    let case = state
        .storage
        .create_case(input)
        .map_err(ApiErr::from_db("create case"))?;
    tracing::info!(case_id = case.id, case_number = %case.case_number, "Created case");
    Ok((StatusCode::CREATED, Json(case)))
}

pub async fn list_assignees(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .list_case_assignees(id)
        .map_err(ApiErr::from_db("list case assignees"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn assign_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<CaseAssignment>), ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    let input: InsertCaseAssignment = serde_json::from_slice(&body)
        .map_err(|_| ApiErr::bad_request(INVALID_ASSIGNMENT))?;
    let assignment = state
        .storage
        .assign_user_to_case(id, input.user_id)
        .map_err(ApiErr::from_db("assign user to case"))?
        .ok_or_else(|| ApiErr::not_found("Case or user not found"))?;
    tracing::info!(case_id = id, user_id = input.user_id, "Assigned user to case");
    Ok((StatusCode::CREATED, Json(assignment)))
}
