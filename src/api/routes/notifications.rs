use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use lexdesk_core::models::{InsertNotification, Notification};

use super::{parse_body, parse_id};
use crate::api::{ApiErr, AppState};

const NOT_FOUND: &str = "Notification not found";
const INVALID: &str = "Invalid notification data";

pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, ApiErr> {
    let notifications = state
        .storage
        .list_notifications()
        .map_err(ApiErr::from_db("list notifications"))?;
    Ok(Json(notifications))
}

pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .get_notification(id)
        .map_err(ApiErr::from_db("get notification"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}

pub async fn create_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Notification>), ApiErr> {
    let input: InsertNotification = parse_body(&body, INVALID)?;
    let notification = state
        .storage
        .create_notification(input)
        .map_err(ApiErr::from_db("create notification"))?;
    tracing::info!(notification_id = notification.id, kind = notification.kind.as_str(), "Created notification");
    Ok((StatusCode::CREATED, Json(notification)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ApiErr> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .storage
        .mark_notification_read(id)
        .map_err(ApiErr::from_db("mark notification read"))?
        .map(Json)
        .ok_or_else(|| ApiErr::not_found(NOT_FOUND))
}
