//! Command-line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::api::AppConfig;
use lexdesk_core::{crypto, Database, MemStorage, Storage};

pub const DEFAULT_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// Process-local maps, lost on exit
    Memory,
    /// SQLite file
    Sqlite,
}

#[derive(Debug, Clone, Args)]
pub struct StorageArgs {
    /// Storage backend
    #[arg(long, env = "LEXDESK_STORAGE", value_enum, default_value_t = StorageKind::Sqlite)]
    pub storage: StorageKind,

    /// SQLite database path (defaults to the platform data directory)
    #[arg(long, env = "LEXDESK_DB")]
    pub db: Option<PathBuf>,

    /// PBKDF2 iterations for new password hashes
    #[arg(
        long,
        env = "LEXDESK_HASH_ITERATIONS",
        default_value_t = crypto::DEFAULT_ITERATIONS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub hash_iterations: u32,
}

impl StorageArgs {
    pub fn open(&self) -> Result<Arc<dyn Storage>> {
        match self.storage {
            StorageKind::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Arc::new(MemStorage::new()))
            }
            StorageKind::Sqlite => {
                let path = match &self.db {
                    Some(path) => path.clone(),
                    None => Database::default_path()?,
                };
                tracing::info!("Using SQLite database at {}", path.display());
                let db = Database::open(&path)?;
                db.migrate()?;
                Ok(Arc::new(db))
            }
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "LEXDESK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP API
    #[arg(short, long, env = "LEXDESK_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seed demo data when the store has no users
    #[arg(long, env = "LEXDESK_SEED")]
    pub seed: bool,

    /// Delay before the built-in assistant replies, in milliseconds
    #[arg(long, env = "LEXDESK_ASSISTANT_DELAY_MS", default_value_t = 1000)]
    pub assistant_delay_ms: u64,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl ServeArgs {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            hash_iterations: self.storage.hash_iterations,
            assistant_delay: Duration::from_millis(self.assistant_delay_ms),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where client subcommands find the server.
#[derive(Debug, Clone, Args)]
pub struct RemoteArgs {
    /// Base URL of a running LexDesk server
    #[arg(long, env = "LEXDESK_URL", default_value = DEFAULT_URL)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn defaults() {
        let h = Harness::try_parse_from(["lexdesk"]).unwrap();
        assert_eq!(h.serve.addr(), "127.0.0.1:3000");
        assert_eq!(h.serve.storage.storage, StorageKind::Sqlite);
        assert!(!h.serve.seed);
        assert_eq!(h.serve.app_config().hash_iterations, crypto::DEFAULT_ITERATIONS);
    }

    #[test]
    fn memory_storage_opens_empty() {
        let h = Harness::try_parse_from(["lexdesk", "--storage", "memory", "--port", "8080"]).unwrap();
        assert_eq!(h.serve.port, 8080);
        let storage = h.serve.storage.open().unwrap();
        assert!(storage.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn zero_hash_iterations_are_rejected() {
        let err = Harness::try_parse_from(["lexdesk", "--hash-iterations", "0"])
            .err()
            .expect("zero iterations should not parse");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let h = Harness::try_parse_from(["lexdesk", "--hash-iterations", "1"]).unwrap();
        assert_eq!(h.serve.storage.hash_iterations, 1);
    }

    #[test]
    fn sqlite_path_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let h = Harness::try_parse_from([
            "lexdesk",
            "--storage",
            "sqlite",
            "--db",
            path.to_str().unwrap(),
        ])
        .unwrap();
        h.serve.storage.open().unwrap();
        assert!(path.exists());
    }
}
