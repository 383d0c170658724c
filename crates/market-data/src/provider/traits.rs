//! Provider trait definitions and validated request types.
//!
//! This module defines the adapter contracts that all upstream
//! implementations must follow, one trait per data shape.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{Article, ChartSeries, Granularity, Instrument, Post};

/// Validated chart request.
///
/// Construction is the validation step: requests are checked before any
/// network dispatch, so an adapter never sees an empty instrument id or a
/// zero day range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChartRequest {
    coin_id: String,
    days: u32,
}

impl ChartRequest {
    /// Create a validated chart request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidRequest`] if the instrument id is
    /// empty or the day range is zero. Fails fast - no network call is made
    /// for an invalid request.
    pub fn new(coin_id: impl Into<String>, days: u32) -> Result<Self, ProviderError> {
        let coin_id = coin_id.into();
        if coin_id.trim().is_empty() {
            return Err(ProviderError::InvalidRequest(
                "chart request requires a non-empty instrument id".to_string(),
            ));
        }
        if days == 0 {
            return Err(ProviderError::InvalidRequest(
                "chart request day range must be a positive integer".to_string(),
            ));
        }
        Ok(Self { coin_id, days })
    }

    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Sampling granularity for this request (fixed rule, not a heuristic).
    pub fn granularity(&self) -> Granularity {
        Granularity::for_days(self.days)
    }

    /// Request identity used as the cache key.
    pub fn cache_key(&self) -> String {
        format!("chart:{}:{}", self.coin_id, self.days)
    }
}

/// Market data adapter contract.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as they are shared across tasks.
#[async_trait]
pub trait MarketChartProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "COINGECKO". Used for logging and
    /// status tracking.
    fn id(&self) -> &'static str;

    /// Fetch a price series for one instrument.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] classified per the upstream's failure
    /// policy; the wait on the upstream is always bounded and a timeout
    /// converts to `Unavailable`.
    async fn chart(&self, request: &ChartRequest) -> Result<ChartSeries, ProviderError>;

    /// Fetch the current market snapshot for the tracked instruments.
    async fn markets(&self) -> Result<Vec<Instrument>, ProviderError>;
}

/// Social feed adapter contract.
#[async_trait]
pub trait SocialFeedProvider: Send + Sync {
    /// Unique identifier for this provider.
    fn id(&self) -> &'static str;

    /// Whether the required credential is present.
    fn is_configured(&self) -> bool;

    /// Fetch the latest posts, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] without any network call
    /// when the credential is absent.
    async fn latest_posts(&self) -> Result<Vec<Post>, ProviderError>;
}

/// News feed adapter contract.
#[async_trait]
pub trait NewsFeedProvider: Send + Sync {
    /// Unique identifier for this provider.
    fn id(&self) -> &'static str;

    /// Whether the required credential is present.
    fn is_configured(&self) -> bool;

    /// Fetch the latest articles, most recent first.
    async fn latest_articles(&self) -> Result<Vec<Article>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_fails_fast() {
        let error = ChartRequest::new("", 7).unwrap_err();
        assert!(matches!(error, ProviderError::InvalidRequest(_)));

        let error = ChartRequest::new("   ", 7).unwrap_err();
        assert!(matches!(error, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn test_zero_days_fails_fast() {
        let error = ChartRequest::new("bitcoin", 0).unwrap_err();
        assert!(matches!(error, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn test_granularity_rule() {
        assert_eq!(
            ChartRequest::new("bitcoin", 1).unwrap().granularity(),
            Granularity::Hourly
        );
        for days in [7, 14, 30, 90] {
            assert_eq!(
                ChartRequest::new("bitcoin", days).unwrap().granularity(),
                Granularity::Daily
            );
        }
    }

    #[test]
    fn test_cache_key_is_request_identity() {
        let request = ChartRequest::new("bitcoin", 7).unwrap();
        assert_eq!(request.cache_key(), "chart:bitcoin:7");

        let other = ChartRequest::new("bitcoin", 30).unwrap();
        assert_ne!(request.cache_key(), other.cache_key());
    }
}
