//! HTTP client for the LexDesk API.
//!
//! Reads go through a [`QueryClient`] keyed by request path; every successful
//! write invalidates the collection it changed.

mod query;

pub use query::QueryClient;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use lexdesk_core::models::*;

use crate::assistant::{AssistantReply, AssistantRequest, Responder};

pub const TASKS: &str = "/api/tasks";
pub const CASES: &str = "/api/cases";
pub const CLIENTS: &str = "/api/clients";
pub const CALLS: &str = "/api/calls";
pub const NOTIFICATIONS: &str = "/api/notifications";
pub const USERS: &str = "/api/users";
pub const STATS: &str = "/api/stats";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: QueryClient,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_cache(base_url, QueryClient::new())
    }

    pub fn with_cache(base_url: impl Into<String>, cache: QueryClient) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        }
    }

    pub fn cache(&self) -> &QueryClient {
        &self.cache
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        tracing::debug!(%method, %url, "api request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    if text.is_empty() {
                        status.canonical_reason().unwrap_or("request failed").to_string()
                    } else {
                        text
                    }
                });
            return Err(ClientError::Http { status, message });
        }
        Ok(response.json::<Value>().await?)
    }

    /// Cached GET.
    async fn query<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let value = self
            .cache
            .fetch(path, || self.send(Method::GET, path, None))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Write, then invalidate every key in `invalidates`.
    async fn mutate<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        invalidates: &[&str],
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        let value = self.send(method, path, Some(&body)).await?;
        for key in invalidates {
            self.cache.invalidate(key);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn stats(&self) -> Result<Stats, ClientError> {
        self.query(STATS).await
    }

    pub async fn tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.query(TASKS).await
    }

    pub async fn task(&self, id: i64) -> Result<Task, ClientError> {
        self.query(&format!("{TASKS}/{id}")).await
    }

    pub async fn create_task(&self, input: &InsertTask) -> Result<Task, ClientError> {
        self.mutate(Method::POST, TASKS, input, &[TASKS]).await
    }

    pub async fn cases(&self) -> Result<Vec<Case>, ClientError> {
        self.query(CASES).await
    }

    pub async fn create_case(&self, input: &InsertCase) -> Result<Case, ClientError> {
        self.mutate(Method::POST, CASES, input, &[CASES]).await
    }

    pub async fn clients(&self) -> Result<Vec<Client>, ClientError> {
        self.query(CLIENTS).await
    }

    pub async fn create_client(&self, input: &InsertClient) -> Result<Client, ClientError> {
        self.mutate(Method::POST, CLIENTS, input, &[CLIENTS]).await
    }

    pub async fn calls(&self) -> Result<Vec<Call>, ClientError> {
        self.query(CALLS).await
    }

    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        self.query(USERS).await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.query(NOTIFICATIONS).await
    }

    pub async fn create_notification(
        &self,
        input: &InsertNotification,
    ) -> Result<Notification, ClientError> {
        self.mutate(Method::POST, NOTIFICATIONS, input, &[NOTIFICATIONS])
            .await
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<Notification, ClientError> {
        let item = format!("{NOTIFICATIONS}/{id}");
        self.mutate(
            Method::PATCH,
            &format!("{item}/read"),
            &Value::Null,
            &[NOTIFICATIONS, item.as_str()],
        )
        .await
    }

    /// Not cached: a login is never replayed.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let value = self.send(Method::POST, "/api/auth/login", Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl Responder for ApiClient {
    async fn respond(&self, section: &str, message: &str) -> anyhow::Result<String> {
        let body = serde_json::to_value(AssistantRequest {
            section: section.to_string(),
            message: message.to_string(),
        })?;
        let value = self
            .send(Method::POST, "/api/assistant/messages", Some(&body))
            .await?;
        let reply: AssistantReply = serde_json::from_value(value)?;
        Ok(reply.reply)
    }
}
