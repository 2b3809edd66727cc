use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: i64,
    pub company: String,
    pub scheduled_at: DateTime<Utc>,
    /// Minutes.
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCall {
    pub company: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for InsertCall {
    fn validate(&self) -> Result<(), ValidationError> {
        require("company", &self.company)?;
        match self.duration {
            Some(minutes) if minutes < 0 => Err(ValidationError::Invalid("duration")),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallParticipant {
    pub id: i64,
    pub call_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
