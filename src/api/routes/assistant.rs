use axum::{body::Bytes, extract::State, Json};

use crate::api::{ApiErr, AppState};
use crate::assistant::{AssistantReply, AssistantRequest, FALLBACK_REPLY};

pub async fn send_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AssistantReply>, ApiErr> {
    let req: AssistantRequest = serde_json::from_slice(&body)
        .ok()
        .filter(|r: &AssistantRequest| !r.message.trim().is_empty())
        .ok_or_else(|| ApiErr::bad_request("Invalid message data"))?;

    let reply = match state.responder.respond(&req.section, &req.message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(section = %req.section, "assistant responder failed: {e:#}");
            FALLBACK_REPLY.to_string()
        }
    };
    Ok(Json(AssistantReply { reply }))
}
