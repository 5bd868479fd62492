//! Query Cache
//!
//! Key-indexed registry of [`Query`] entries. Constructed once at process
//! start and passed by reference to every consumer; there is no global
//! instance.

use futures_util::future::{join_all, BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use super::entry::{Query, QuerySnapshot};
use super::key::ResourceKey;
use crate::remote::FetchResult;

/// Type-erased view of an entry, so the cache can hold any payload type
trait CachedQuery: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn refetch_erased(&self) -> BoxFuture<'static, ()>;
    fn is_fetching(&self) -> bool;
}

impl<T: Send + Sync + 'static> CachedQuery for Query<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn refetch_erased(&self) -> BoxFuture<'static, ()> {
        self.refetch().map(|_| ()).boxed()
    }

    fn is_fetching(&self) -> bool {
        self.snapshot().is_fetching
    }
}

/// Errors raised by the cache registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The key is already registered with a different payload type
    #[error("Cache key {0} holds a different payload type")]
    TypeMismatch(ResourceKey),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Shared in-memory query cache
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<ResourceKey, Arc<dyn CachedQuery>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for `key`, registering it with `fetcher` on first use.
    ///
    /// Later calls for the same key return the existing entry and ignore
    /// their `fetcher`.
    pub fn query<T, F, Fut>(&self, key: impl Into<ResourceKey>, fetcher: F) -> CacheResult<Query<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchResult<Option<T>>> + Send + 'static,
    {
        let key = key.into();

        if let Some(existing) = self.get::<T>(&key)? {
            return Ok(existing);
        }

        let mut entries = self.entries.write();
        // Another caller may have registered the key between the locks.
        if let Some(entry) = entries.get(&key) {
            return downcast(&key, entry.as_ref());
        }

        let query = Query::with_fetcher(key.clone(), fetcher);
        entries.insert(key.clone(), Arc::new(query.clone()));
        tracing::debug!(key = %key, "Registered query");
        Ok(query)
    }

    /// Existing entry for `key`, if registered
    pub fn get<T: Send + Sync + 'static>(&self, key: &ResourceKey) -> CacheResult<Option<Query<T>>> {
        let entries = self.entries.read();
        entries
            .get(key)
            .map(|entry| downcast(key, entry.as_ref()))
            .transpose()
    }

    pub fn snapshot<T: Send + Sync + 'static>(
        &self,
        key: &ResourceKey,
    ) -> CacheResult<Option<QuerySnapshot<T>>> {
        Ok(self.get::<T>(key)?.map(|query| query.snapshot()))
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<ResourceKey> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of entries with a request in flight
    pub fn fetching_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_fetching())
            .count()
    }

    /// Refetch every registered entry concurrently
    pub async fn refetch_all(&self) {
        let pending: Vec<_> = self
            .entries
            .read()
            .values()
            .map(|entry| entry.refetch_erased())
            .collect();
        join_all(pending).await;
    }

    /// Drop an entry; in-flight requests still complete into the old entry
    pub fn remove(&self, key: &ResourceKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

fn downcast<T: Send + Sync + 'static>(key: &ResourceKey, entry: &dyn CachedQuery) -> CacheResult<Query<T>> {
    entry
        .as_any()
        .downcast_ref::<Query<T>>()
        .cloned()
        .ok_or_else(|| CacheError::TypeMismatch(key.clone()))
}
