pub mod assistant;
pub mod auth;
pub mod calls;
pub mod cases;
pub mod clients;
pub mod health;
pub mod navigation;
pub mod notifications;
pub mod stats;
pub mod tasks;
pub mod users;

use serde::de::DeserializeOwned;

use lexdesk_core::models::Validate;

use super::ApiErr;

/// Path ids that are not integers cannot name a record.
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> Result<i64, ApiErr> {
    raw.parse::<i64>().map_err(|_| ApiErr::not_found(not_found))
}

/// Parse and validate an insert payload. Every failure, from malformed JSON
/// to a blank required field, becomes the same fixed 400 message.
pub(crate) fn parse_body<T>(body: &[u8], invalid: &'static str) -> Result<T, ApiErr>
where
    T: DeserializeOwned + Validate,
{
    let input: T = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("rejected payload: {e}");
        ApiErr::bad_request(invalid)
    })?;
    input.validate().map_err(|e| {
        tracing::debug!("rejected payload: {e}");
        ApiErr::bad_request(invalid)
    })?;
    Ok(input)
}

pub async fn not_found() -> ApiErr {
    ApiErr::not_found("Not found")
}
