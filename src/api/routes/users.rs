use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use lexdesk_core::crypto;
use lexdesk_core::models::{InsertUser, User};
use lexdesk_core::StorageError;

use super::{parse_body, parse_id};
use crate::api::{ApiErr, AppState};

const NOT_FOUND: &str = "User not found";
const INVALID: &str = "Invalid user data";

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiErr> {
    let users = state
        .storage
        .list_users()
        .map_err(ApiErr::from_db("list users"))?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .get_user(id)
        .map_err(ApiErr::from_db("get user"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiErr> {
    let mut input: InsertUser = parse_body(&body, INVALID)?;

    // Hashing runs on the blocking pool.
    let password = std::mem::take(&mut input.password);
    let iterations = state.config.hash_iterations;
    let password_hash =
        tokio::task::spawn_blocking(move || crypto::hash_password(&password, iterations))
            .await
            .map_err(ApiErr::from_db("password hashing"))?
            .map_err(ApiErr::from_db("hash password"))?;

    match state.storage.create_user(input.into_new_user(password_hash)) {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "Created user");
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(StorageError::Duplicate(_)) => Err(ApiErr::conflict("Username already exists")),
        Err(e) => Err(ApiErr::from_db("create user")(e)),
    }
}
