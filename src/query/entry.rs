//! Keyed query entry
//!
//! A [`Query`] owns the cached value of one resource key together with its
//! loading state. Concurrent loads share one in-flight request; a manual
//! refetch always issues a new one. Completions are applied in the order
//! they finish (the last request to complete wins), sequenced by a per-key
//! counter taken under the entry lock.

use chrono::{DateTime, Utc};
use futures_util::future::{self, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::key::ResourceKey;
use crate::remote::{FetchError, FetchResult};

/// Boxed fetch operation for one resource
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, FetchResult<Option<T>>> + Send + Sync>;

/// Outcome of a single request
pub type QueryResult<T> = FetchResult<Option<Arc<T>>>;

/// Handle to a (possibly shared) request; resolves when it completes
pub type QueryFuture<T> = Shared<BoxFuture<'static, QueryResult<T>>>;

/// Point-in-time view of a query entry
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    pub key: ResourceKey,
    /// Last successfully fetched payload (`None` before the first success,
    /// or when the server sent no data)
    pub data: Option<Arc<T>>,
    /// Error of the most recently completed request, if it failed
    pub error: Option<FetchError>,
    /// No data has ever been obtained and the first load is pending
    pub is_loading: bool,
    /// Data is present and a request is in flight
    pub is_refetching: bool,
    pub is_fetching: bool,
    /// At least one request has succeeded
    pub is_success: bool,
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of completed requests applied to this entry
    pub version: u64,
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_refetching: self.is_refetching,
            is_fetching: self.is_fetching,
            is_success: self.is_success,
            updated_at: self.updated_at,
            version: self.version,
        }
    }
}

impl<T> QuerySnapshot<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

struct QueryState<T> {
    data: Option<Arc<T>>,
    error: Option<FetchError>,
    has_succeeded: bool,
    issued: u64,
    completed: u64,
    in_flight: usize,
    /// Most recently issued request; `fetch()` joins it
    pending: Option<(u64, QueryFuture<T>)>,
    updated_at: Option<DateTime<Utc>>,
}

impl<T> QueryState<T> {
    fn new() -> Self {
        Self {
            data: None,
            error: None,
            has_succeeded: false,
            issued: 0,
            completed: 0,
            in_flight: 0,
            pending: None,
            updated_at: None,
        }
    }

    fn snapshot(&self, key: &ResourceKey) -> QuerySnapshot<T> {
        QuerySnapshot {
            key: key.clone(),
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: !self.has_succeeded && (self.in_flight > 0 || self.completed == 0),
            is_refetching: self.has_succeeded && self.in_flight > 0,
            is_fetching: self.in_flight > 0,
            is_success: self.has_succeeded,
            updated_at: self.updated_at,
            version: self.completed,
        }
    }
}

struct Inner<T> {
    key: ResourceKey,
    fetcher: Fetcher<T>,
    state: Mutex<QueryState<T>>,
    tx: watch::Sender<QuerySnapshot<T>>,
}

impl<T: Send + Sync + 'static> Inner<T> {
    /// Issue a new request. The caller holds the entry lock, so the fetcher
    /// is only invoked inside the spawned task.
    fn start(self: &Arc<Self>, state: &mut QueryState<T>) -> QueryFuture<T> {
        let Ok(runtime) = Handle::try_current() else {
            tracing::error!(key = %self.key, "Query started outside a tokio runtime");
            return future::ready(Err(FetchError::unexpected("no tokio runtime")))
                .boxed()
                .shared();
        };

        state.issued += 1;
        state.in_flight += 1;
        let request = state.issued;

        tracing::debug!(
            key = %self.key,
            request,
            in_flight = state.in_flight,
            "Query request started"
        );

        let inner = Arc::clone(self);
        let task = runtime.spawn(async move {
            let fetcher = Arc::clone(&inner.fetcher);
            let result = AssertUnwindSafe(async move { fetcher().await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(FetchError::unexpected("fetch task panicked")));
            inner.complete(request, result)
        });

        let handle = async move {
            task.await
                .unwrap_or_else(|e| Err(FetchError::unexpected(e)))
        }
        .boxed()
        .shared();

        state.pending = Some((request, handle.clone()));
        self.tx.send_replace(state.snapshot(&self.key));
        handle
    }

    fn complete(&self, request: u64, result: FetchResult<Option<T>>) -> QueryResult<T> {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if matches!(&state.pending, Some((id, _)) if *id == request) {
            state.pending = None;
        }

        // Taken under the lock: strictly increasing in completion order.
        state.completed += 1;

        let outcome = match result {
            Ok(data) => {
                let data = data.map(Arc::new);
                state.data = data.clone();
                state.error = None;
                state.has_succeeded = true;
                state.updated_at = Some(Utc::now());
                Ok(data)
            }
            Err(err) => {
                tracing::warn!(key = %self.key, request, error = %err, "Query request failed");
                state.error = Some(err.clone());
                Err(err)
            }
        };

        tracing::debug!(
            key = %self.key,
            request,
            version = state.completed,
            "Query request completed"
        );

        self.tx.send_replace(state.snapshot(&self.key));
        outcome
    }
}

/// One cache entry; cheap to clone, clones share state
pub struct Query<T> {
    inner: Arc<Inner<T>>,
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").field("key", &self.inner.key).finish()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> Query<T> {
    pub fn new(key: ResourceKey, fetcher: Fetcher<T>) -> Self {
        let state = QueryState::new();
        let (tx, _) = watch::channel(state.snapshot(&key));

        Self {
            inner: Arc::new(Inner {
                key,
                fetcher,
                state: Mutex::new(state),
                tx,
            }),
        }
    }

    /// Create an entry from a plain async fetch function
    pub fn with_fetcher<F, Fut>(key: ResourceKey, fetcher: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchResult<Option<T>>> + Send + 'static,
    {
        Self::new(key, Arc::new(move || fetcher().boxed()))
    }

    pub fn key(&self) -> &ResourceKey {
        &self.inner.key
    }

    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.inner.state.lock().snapshot(&self.inner.key)
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot<T>> {
        self.inner.tx.subscribe()
    }

    /// Total requests issued for this key
    pub fn requests_issued(&self) -> u64 {
        self.inner.state.lock().issued
    }

    /// Load the entry if needed.
    ///
    /// Joins the in-flight request when there is one. Once a request has
    /// succeeded the cached value is returned without a new request.
    ///
    /// Outside a tokio runtime the future resolves to
    /// [`FetchError::Unexpected`] and no request is recorded.
    pub fn fetch(&self) -> QueryFuture<T> {
        let mut state = self.inner.state.lock();

        if let Some((_, pending)) = &state.pending {
            return pending.clone();
        }
        if state.has_succeeded {
            return future::ready(Ok(state.data.clone())).boxed().shared();
        }

        self.inner.start(&mut state)
    }

    /// Always issue a new request, regardless of freshness.
    ///
    /// The returned future resolves with this request's own outcome, even if
    /// another request for the same key completes later and overwrites it.
    /// Outside a tokio runtime it fails like [`Query::fetch`].
    pub fn refetch(&self) -> QueryFuture<T> {
        let mut state = self.inner.state.lock();
        self.inner.start(&mut state)
    }
}
