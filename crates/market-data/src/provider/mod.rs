//! Provider adapters for upstream data sources.
//!
//! One module per upstream; every adapter is stateless, idempotent for
//! identical inputs, and owns its upstream's failure policy.

pub mod coingecko;
pub mod cryptopanic;
mod traits;
pub mod twitter;

pub use traits::{ChartRequest, MarketChartProvider, NewsFeedProvider, SocialFeedProvider};

use reqwest::StatusCode;

use crate::errors::ProviderError;

/// Classify a non-success HTTP status into the provider taxonomy.
///
/// Returns `None` for success statuses. 4xx statuses other than 429 mean the
/// upstream rejected our request shape, which the caller cannot fix by
/// retrying - they classify as unavailable rather than invalid, since the
/// original caller input was already validated before dispatch.
pub(crate) fn classify_status(provider: &str, status: StatusCode) -> Option<ProviderError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some(ProviderError::RateLimited {
            provider: provider.to_string(),
        });
    }
    Some(ProviderError::Unavailable {
        provider: provider.to_string(),
        message: format!("upstream returned HTTP {}", status.as_u16()),
    })
}
