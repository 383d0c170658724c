//! Error types and fallback classification for the market data crate.
//!
//! This module provides:
//! - [`ProviderError`]: The main error enum for all provider operations
//! - [`FallbackClass`]: Classification for determining substitution behavior
//! - [`FailureCause`]: The upstream condition behind a substitution

mod class;

pub use class::{FailureCause, FallbackClass};

use thiserror::Error;

/// Errors that can occur while fetching from an upstream provider.
///
/// Each variant is classified into a [`FallbackClass`] via the
/// [`fallback_class`](Self::fallback_class) method, which determines whether
/// the fallback cascade masks the error with substitute content or surfaces
/// it to the caller.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The caller supplied an invalid request.
    /// This is a terminal error - it is never retried and never masked.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider explicitly signaled throttling (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The upstream could not be reached or returned a server error.
    /// Covers network failures, 5xx responses, and timeouts.
    #[error("Upstream unavailable: {provider} - {message}")]
    Unavailable {
        /// The provider that was unavailable
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// A required credential for this provider is absent.
    /// Distinguishes "never configured" from "temporarily failing".
    #[error("Provider not configured: {provider}")]
    NotConfigured {
        /// The provider missing its credential
        provider: String,
    },

    /// An unexpected local fault occurred.
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Returns the fallback classification for this error.
    ///
    /// This classification determines how the fallback cascade should handle
    /// the error:
    ///
    /// - [`FallbackClass::Substitute`]: Mask with substitute content
    /// - [`FallbackClass::Surface`]: Surface to the caller unchanged
    ///
    /// # Examples
    ///
    /// ```
    /// use coindash_market_data::{FailureCause, FallbackClass, ProviderError};
    ///
    /// let error = ProviderError::RateLimited { provider: "COINGECKO".to_string() };
    /// assert_eq!(
    ///     error.fallback_class(),
    ///     FallbackClass::Substitute(FailureCause::RateLimited)
    /// );
    ///
    /// let error = ProviderError::InvalidRequest("empty id".to_string());
    /// assert_eq!(error.fallback_class(), FallbackClass::Surface);
    /// ```
    pub fn fallback_class(&self) -> FallbackClass {
        match self {
            // Upstream conditions - always masked for content feeds
            Self::RateLimited { .. } => FallbackClass::Substitute(FailureCause::RateLimited),
            Self::Unavailable { .. } => FallbackClass::Substitute(FailureCause::Unavailable),
            Self::NotConfigured { .. } => FallbackClass::Substitute(FailureCause::NotConfigured),

            // Caller errors and local faults - never masked
            Self::InvalidRequest(_) | Self::Internal(_) => FallbackClass::Surface,
        }
    }

    /// Converts a reqwest transport error into the provider taxonomy.
    ///
    /// Timeouts and connection failures both mean the upstream is
    /// unavailable; a 429 observed at the transport level still classifies
    /// as rate limiting.
    pub fn from_transport(provider: &str, error: reqwest::Error) -> Self {
        if error.status().map(|s| s.as_u16()) == Some(429) {
            return Self::RateLimited {
                provider: provider.to_string(),
            };
        }
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        };
        Self::Unavailable {
            provider: provider.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_surfaces() {
        let error = ProviderError::InvalidRequest("missing instrument id".to_string());
        assert_eq!(error.fallback_class(), FallbackClass::Surface);
    }

    #[test]
    fn test_internal_surfaces() {
        let error = ProviderError::Internal("poisoned state".to_string());
        assert_eq!(error.fallback_class(), FallbackClass::Surface);
    }

    #[test]
    fn test_rate_limited_substitutes() {
        let error = ProviderError::RateLimited {
            provider: "COINGECKO".to_string(),
        };
        assert_eq!(
            error.fallback_class(),
            FallbackClass::Substitute(FailureCause::RateLimited)
        );
    }

    #[test]
    fn test_unavailable_substitutes() {
        let error = ProviderError::Unavailable {
            provider: "TWITTER".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.fallback_class(),
            FallbackClass::Substitute(FailureCause::Unavailable)
        );
    }

    #[test]
    fn test_not_configured_substitutes() {
        let error = ProviderError::NotConfigured {
            provider: "CRYPTOPANIC".to_string(),
        };
        assert_eq!(
            error.fallback_class(),
            FallbackClass::Substitute(FailureCause::NotConfigured)
        );
    }

    #[test]
    fn test_error_display() {
        let error = ProviderError::InvalidRequest("empty id".to_string());
        assert_eq!(format!("{}", error), "Invalid request: empty id");

        let error = ProviderError::RateLimited {
            provider: "COINGECKO".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: COINGECKO");

        let error = ProviderError::NotConfigured {
            provider: "TWITTER".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider not configured: TWITTER");
    }
}
