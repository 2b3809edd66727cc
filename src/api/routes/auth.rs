use axum::{body::Bytes, extract::State, Json};

use lexdesk_core::crypto;
use lexdesk_core::models::{LoginRequest, LoginResponse};

use crate::api::{ApiErr, AppState};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Username/password login.
///
/// An unknown username and a wrong password produce the same response, and
/// both pay for one full password verification.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiErr> {
    let req: LoginRequest =
        serde_json::from_slice(&body).map_err(|_| ApiErr::bad_request("Invalid login data"))?;

    let credential = state
        .storage
        .get_user_credential(req.username.trim())
        .map_err(ApiErr::from_db("login lookup"))?;

    let password = req.password;
    let iterations = state.config.hash_iterations;
    let (user, verified) = tokio::task::spawn_blocking(move || match credential {
        Some((user, hash)) => {
            let verified = crypto::verify_password(&password, &hash);
            (Some(user), verified)
        }
        None => (None, crypto::verify_unknown_user(&password, iterations)),
    })
    .await
    .map_err(ApiErr::from_db("password verification"))?;

    match user {
        Some(user) if verified => {
            tracing::info!(user_id = user.id, "Login succeeded");
            Ok(Json(LoginResponse {
                id: user.id,
                username: user.username,
            }))
        }
        _ => {
            tracing::warn!("Login rejected");
            Err(ApiErr::unauthorized(INVALID_CREDENTIALS))
        }
    }
}
