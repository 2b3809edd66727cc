mod error;
pub mod routes;

pub use error::ApiErr;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::assistant::{CannedResponder, Responder};
use lexdesk_core::{crypto, Storage};

/// Settings the handlers need at request time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PBKDF2 iterations for newly hashed passwords.
    pub hash_iterations: u32,
    /// Artificial latency of the built-in assistant.
    pub assistant_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hash_iterations: crypto::DEFAULT_ITERATIONS,
            assistant_delay: Duration::from_millis(1000),
        }
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub responder: Arc<dyn Responder>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: AppConfig) -> Self {
        let responder = Arc::new(CannedResponder::new(config.assistant_delay));
        Self {
            storage,
            responder,
            config: Arc::new(config),
        }
    }

    pub fn with_responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responder = responder;
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/stats", get(routes::stats::get_stats))
        // Tasks
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/{id}", get(routes::tasks::get_task))
        // Cases
        .route(
            "/cases",
            get(routes::cases::list_cases).post(routes::cases::create_case),
        )
        .route("/cases/{id}", get(routes::cases::get_case))
        .route(
            "/cases/{id}/assignees",
            get(routes::cases::list_assignees).post(routes::cases::assign_user),
        )
        // Clients
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route("/clients/{id}", get(routes::clients::get_client))
        // Calls
        .route("/calls", get(routes::calls::list_calls))
        .route("/calls/{id}", get(routes::calls::get_call))
        .route(
            "/calls/{id}/participants",
            get(routes::calls::list_participants),
        )
        // Notifications
        .route(
            "/notifications",
            get(routes::notifications::list_notifications)
                .post(routes::notifications::create_notification),
        )
        .route(
            "/notifications/{id}",
            get(routes::notifications::get_notification),
        )
        .route(
            "/notifications/{id}/read",
            patch(routes::notifications::mark_read),
        )
        // Users and auth
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route("/users/{id}", get(routes::users::get_user))
        .route("/auth/login", post(routes::auth::login))
        // Shell
        .route("/navigation", get(routes::navigation::navigation))
        .route("/assistant/messages", post(routes::assistant::send_message))
        .fallback(routes::not_found);

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
