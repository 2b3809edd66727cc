use axum::{extract::State, Json};

use lexdesk_core::models::Stats;

use crate::api::{ApiErr, AppState};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiErr> {
    let stats = state
        .storage
        .get_stats()
        .map_err(ApiErr::from_db("get stats"))?;
    Ok(Json(stats))
}
