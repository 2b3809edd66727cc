use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tokio::sync::OnceCell;

/// Keyed cache of server state.
///
/// Construct one per application and hand clones to whoever fetches; clones
/// share the cache. A key stays cached until it is invalidated. Concurrent
/// fetches of the same key wait on a single request, and a failed fetch
/// leaves nothing cached.
#[derive(Clone, Default)]
pub struct QueryClient {
    entries: Arc<Mutex<HashMap<String, Arc<OnceCell<Value>>>>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, running `fetcher` only on a miss.
    pub async fn fetch<F, Fut, E>(&self, key: &str, fetcher: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(key.to_string()).or_default().clone()
        };
        let value = cell.get_or_try_init(fetcher).await?;
        Ok(value.clone())
    }

    /// The cached value, if a fetch for `key` has completed.
    pub fn peek(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drop `key` so the next fetch goes to the server. A fetch already in
    /// flight completes into the discarded entry.
    pub fn invalidate(&self, key: &str) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            tracing::debug!(key, "invalidated query");
        }
    }

    pub fn invalidate_all(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    async fn counted(calls: &AtomicUsize, value: Value) -> Result<Value, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let client = QueryClient::new();
        let calls = AtomicUsize::new(0);

        let first = client.fetch("/api/tasks", || counted(&calls, Value::from(1))).await;
        let second = client.fetch("/api/tasks", || counted(&calls, Value::from(2))).await;

        assert_eq!(first, Ok(Value::from(1)));
        assert_eq!(second, Ok(Value::from(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_request() {
        let client = QueryClient::new();
        let calls = AtomicUsize::new(0);

        let (a, b) = tokio::join!(
            client.fetch("/api/cases", || counted(&calls, Value::from("a"))),
            client.fetch("/api/cases", || counted(&calls, Value::from("b"))),
        );

        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let client = QueryClient::new();
        let calls = AtomicUsize::new(0);

        client.fetch("/api/tasks", || counted(&calls, Value::from(1))).await.unwrap();
        client.invalidate("/api/tasks");
        assert_eq!(client.peek("/api/tasks"), None);
        let refetched = client.fetch("/api/tasks", || counted(&calls, Value::from(2))).await;

        assert_eq!(refetched, Ok(Value::from(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let client = QueryClient::new();

        let failed: Result<Value, String> =
            client.fetch("/api/stats", || async { Err("offline".to_string()) }).await;
        assert!(failed.is_err());
        assert_eq!(client.peek("/api/stats"), None);

        let ok: Result<Value, String> =
            client.fetch("/api/stats", || async { Ok(Value::from(3)) }).await;
        assert_eq!(ok, Ok(Value::from(3)));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let client = QueryClient::new();
        client.fetch::<_, _, String>("/api/tasks", || async { Ok(Value::from(1)) }).await.unwrap();
        client.fetch::<_, _, String>("/api/cases", || async { Ok(Value::from(2)) }).await.unwrap();

        client.invalidate("/api/tasks");
        assert_eq!(client.peek("/api/tasks"), None);
        assert_eq!(client.peek("/api/cases"), Some(Value::from(2)));

        client.invalidate_all();
        assert_eq!(client.peek("/api/cases"), None);
    }
}
