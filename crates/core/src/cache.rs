//! Process-lifetime cache with explicit reload.
//!
//! Holds the reference sets and the feature table so repeated requests do
//! not re-read their sources. A failed load is never cached and a failed
//! reload keeps the previous value.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::CoreError;

pub struct ReloadableCache<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> Default for ReloadableCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReloadableCache<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Return the cached value, running `loader` if nothing is cached yet.
    ///
    /// Concurrent first callers are serialized on the write lock, so the
    /// loader runs at most once per empty slot.
    pub async fn get_or_load<F, Fut>(&self, loader: F) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        if let Some(value) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(value));
        }

        let mut slot = self.slot.write().await;
        if let Some(value) = slot.as_ref() {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(loader().await?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Load a fresh value and swap it in. On failure the old value stays.
    pub async fn reload<F, Fut>(&self, loader: F) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let value = Arc::new(loader().await?);
        *self.slot.write().await = Some(Arc::clone(&value));
        Ok(value)
    }

    pub async fn invalidate(&self) {
        self.slot.write().await.take();
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn loader_runs_once() {
        let cache = ReloadableCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, CoreError>(vec![1, 2, 3])
        };

        let first = cache.get_or_load(load).await.unwrap();
        let second = cache.get_or_load(load).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_not_cached() {
        let cache: ReloadableCache<u32> = ReloadableCache::new();
        let err = cache
            .get_or_load(|| async { Err(CoreError::NotFound("reckoner".into())) })
            .await;
        assert!(err.is_err());
        assert!(!cache.is_loaded().await);

        let value = cache.get_or_load(|| async { Ok(7) }).await.unwrap();
        assert_eq!(*value, 7);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_value() {
        let cache = ReloadableCache::new();
        cache.get_or_load(|| async { Ok(1) }).await.unwrap();
        let err = cache
            .reload(|| async { Err(CoreError::MalformedData("bad".into())) })
            .await;
        assert!(err.is_err());
        let value = cache.get_or_load(|| async { Ok(99) }).await.unwrap();
        assert_eq!(*value, 1);
    }

    #[tokio::test]
    async fn reload_and_invalidate() {
        let cache = ReloadableCache::new();
        cache.get_or_load(|| async { Ok(1) }).await.unwrap();
        let fresh = cache.reload(|| async { Ok(2) }).await.unwrap();
        assert_eq!(*fresh, 2);

        cache.invalidate().await;
        assert!(!cache.is_loaded().await);
    }
}
