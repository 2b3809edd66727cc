use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use lexdesk_core::models::{Client, InsertClient};

use super::{parse_body, parse_id};
use crate::api::{ApiErr, AppState};

const NOT_FOUND: &str = "Client not found";
const INVALID: &str = "Invalid client data";

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, ApiErr> {
    let clients = state
        .storage
        .list_clients()
        .map_err(ApiErr::from_db("list clients"))?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .get_client(id)
        .map_err(ApiErr::from_db("get client"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn create_client(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Client>), ApiErr> {
    let input: InsertClient = parse_body(&body, INVALID)?;
    let client = state
        .storage
        .create_client(input)
        .map_err(ApiErr::from_db("create client"))?;
    tracing::info!(client_id = client.id, "Created client");
    Ok((StatusCode::CREATED, Json(client)))
}
