//! Coindash Core Crate
//!
//! Service layer between the provider adapters and the HTTP surface:
//! freshness-bounded caching with request coalescing, cross-source search,
//! persistent watchlist ordering, and the dashboard orchestration service
//! that ties the adapters to the status tracker.

pub mod cache;
pub mod dashboard;
pub mod ordering;
pub mod search;

pub use cache::FreshnessCache;
pub use dashboard::DashboardService;
pub use ordering::{reconcile, FileOrderStore, OrderStore, OrderingError, WatchlistOrder};
pub use search::{search, SearchHit, SearchKind, MAX_RESULTS, MIN_QUERY_LEN};
