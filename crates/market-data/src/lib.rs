//! Coindash Market Data Crate
//!
//! This crate provides the resilient multi-source aggregation layer for the
//! Coindash dashboard: provider adapters for unreliable upstreams, a fallback
//! cascade that keeps content feeds renderable during outages, and a unified
//! provider status tracker.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Normalized models for instruments, chart series, and content items
//! - Multiple upstream providers: CoinGecko, Twitter, CryptoPanic
//! - Deterministic substitute content when an upstream fails
//! - Aggregate provider health reporting without extra network calls
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |     Caller       | --> | Provider adapter |  (one per upstream)
//! +------------------+     +------------------+
//!                                  |
//!                    success       |       failure
//!                  +---------------+---------------+
//!                  v                               v
//!         +------------------+          +------------------+
//!         | Normalized data  |          | FallbackCascade  |
//!         | (genuine)        |          | (substitute)     |
//!         +------------------+          +------------------+
//!                  |                               |
//!                  +---------------+---------------+
//!                                  v
//!                          +------------------+
//!                          |  StatusTracker   |  (records every outcome)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Instrument`] - Normalized market snapshot for one coin
//! - [`ChartSeries`] - Ordered (timestamp, price) samples for one instrument
//! - [`ContentItem`] - Closed union of articles and social posts
//! - [`FetchOutcome`] - Genuine vs. substitute data, shape-identical
//! - [`ProviderStatus`] - Per-provider health with last-checked timestamp
//!
//! # Error Handling
//!
//! All adapter operations return [`ProviderError`], classified into a
//! [`FallbackClass`] via [`ProviderError::fallback_class`]:
//!
//! ```
//! use coindash_market_data::{FallbackClass, ProviderError};
//!
//! fn handle(error: ProviderError) {
//!     match error.fallback_class() {
//!         FallbackClass::Substitute(_) => {
//!             // serve the substitute dataset
//!         }
//!         FallbackClass::Surface => {
//!             // report to the caller
//!         }
//!     }
//! }
//! ```
//!
//! # Security
//!
//! - API credentials are read from the environment only and never logged
//! - All HTTP requests use TLS via rustls
//! - Every upstream call is bounded by a request timeout

pub mod errors;
pub mod fallback;
pub mod models;
pub mod provider;
pub mod status;

// Re-export commonly used types at crate root for convenience

pub use errors::{FailureCause, FallbackClass, ProviderError};

pub use fallback::{cascade, substitute_articles, substitute_posts, DataOrigin, FetchOutcome};

pub use models::{
    Article, ChartPoint, ChartSeries, ContentItem, Granularity, Instrument, Post, ProviderState,
    ProviderStatus, Sentiment,
};

pub use provider::coingecko::CoinGeckoProvider;
pub use provider::cryptopanic::CryptoPanicProvider;
pub use provider::twitter::TwitterProvider;
pub use provider::{ChartRequest, MarketChartProvider, NewsFeedProvider, SocialFeedProvider};

pub use status::StatusTracker;
