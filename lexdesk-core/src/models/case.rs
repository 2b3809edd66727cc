use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: i64,
    pub title: String,
    pub case_number: String,
    pub client_id: Option<i64>,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Active,
    Pending,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCase {
    pub title: String,
    pub case_number: String,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
}

impl Validate for InsertCase {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("caseNumber", &self.case_number)
    }
}

/// Join row linking a user to a case they work on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaseAssignment {
    pub id: i64,
    pub case_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCaseAssignment {
    pub user_id: i64,
}
