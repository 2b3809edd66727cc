pub mod api;
pub mod assistant;
pub mod client;
pub mod config;
pub mod views;

// Re-export core modules for convenience
pub use lexdesk_core::{crypto, db, models, nav, seed, storage};
