//! # Pulseboard
//!
//! Usage analytics dashboard core: fetches daily interaction counts,
//! platform KPIs, service status, game scores and missed words from the
//! analytics backend, caches them per resource key, and derives the
//! chart-ready view state.
//!
//! ## Layers
//!
//! - [`remote`]: one GET per resource, uniform [`FetchError`]
//! - [`query`]: keyed cache entries with dedup and stale-while-revalidate
//! - [`view`]: pure derivations (filters, pies, cards, formatting)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulseboard::{Config, DashboardQueries, QueryCache, RemoteClient};
//! use pulseboard::view::{DashboardInputs, DashboardViewModel, Selections};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = RemoteClient::new(config.endpoints.clone(), &config.http)?;
//!     let queries = DashboardQueries::new(client, Arc::new(QueryCache::new()));
//!
//!     let report = queries.daily_report()?;
//!     let summary = queries.daily_summary()?;
//!     let status = queries.platform_status()?;
//!     let _ = tokio::join!(report.fetch(), summary.fetch(), status.fetch());
//!
//!     let view = DashboardViewModel::new().derive_now(
//!         DashboardInputs {
//!             report: &report.snapshot(),
//!             summary: &summary.snapshot(),
//!             status: &status.snapshot(),
//!         },
//!         Selections::default(),
//!     );
//!     println!("{:?}", view);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;
pub mod query;
pub mod remote;
pub mod view;

pub use config::{Config, ConfigError, EndpointsConfig, HttpConfig, LoggingConfig};

pub use query::{CacheError, DashboardQueries, Query, QueryCache, QuerySnapshot, ResourceKey};

pub use remote::{FetchError, FetchResult, RemoteClient, Resource, TransportError};

pub use view::{DashboardView, DashboardViewModel, DaySelection, Selections, TimeRangeSelection, ViewError};
