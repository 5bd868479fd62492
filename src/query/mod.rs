//! Query Cache Layer
//!
//! Wraps each remote call in a keyed cache entry that tracks loading,
//! refetching and error state.
//!
//! ## Semantics
//!
//! - **Dedup**: concurrent loads of one key share a single request
//! - **Stale-while-revalidate**: data stays visible during refetch
//! - **Manual refetch**: always a new request, resolved independently
//! - **Ordering**: the request that completes last wins

mod cache;
mod entry;
mod hooks;
mod key;

pub use cache::{CacheError, CacheResult, QueryCache};
pub use entry::{Fetcher, Query, QueryFuture, QueryResult, QuerySnapshot};
pub use hooks::DashboardQueries;
pub use key::ResourceKey;
