use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::error::ValidationError;

/// A user as exposed outside storage. Credential material never lives here;
/// see [`crate::storage::Storage::get_user_credential`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Signup payload. Carries the plaintext password only until it is hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertUser {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl InsertUser {
    /// Swap the plaintext password for its encoded hash.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            password_hash,
            email: self.email,
            full_name: self.full_name,
            job_title: self.job_title,
            avatar: self.avatar,
        }
    }
}

impl Validate for InsertUser {
    fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::Invalid("email"));
        }
        Ok(())
    }
}

/// What storage persists for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
}
