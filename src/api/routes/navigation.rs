use axum::Json;

use lexdesk_core::nav::{self, NavNode};

pub async fn navigation() -> Json<Vec<NavNode>> {
    Json(nav::default_tree())
}
