mod call;
mod case;
mod client;
mod notification;
mod stats;
mod task;
mod user;

pub use call::*;
pub use case::*;
pub use client::*;
pub use notification::*;
pub use stats::*;
pub use task::*;
pub use user::*;

use crate::error::ValidationError;

/// Checks an insert payload against its entity's insert shape.
///
/// Serde already rejects missing non-optional fields and wrong types; this
/// covers the rules serde cannot express, such as blank required text.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(())
}
