//! Core library for LexDesk.
//!
//! This crate provides the domain models, the storage contract and its two
//! collaborators (in-memory and SQLite), independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use lexdesk_core::db::Database;
//! use lexdesk_core::storage::Storage;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let tasks = db.list_tasks()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod crypto;
pub mod db;
pub mod error;
pub mod models;
pub mod nav;
pub mod seed;
pub mod storage;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{StorageError, ValidationError};
pub use storage::{MemStorage, Storage};
