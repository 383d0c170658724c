//! Fallback cascade for content-producing endpoints.
//!
//! Guarantees the caller-facing contract "always returns a well-formed,
//! renderable collection" even when the upstream is down, throttled, or not
//! configured. Substitute datasets are deterministic in structure (same
//! count and fields as a genuine response) but their timestamps are computed
//! relative to now at substitution time, so repeated calls during an outage
//! return freshly-dated content instead of a stale-looking feed.
//!
//! `InvalidRequest` and `Internal` are never substituted - those surface to
//! the caller unchanged.

use chrono::{DateTime, Duration, Utc};

use crate::errors::{FailureCause, FallbackClass, ProviderError};
use crate::models::{Article, Post, Sentiment};

/// Where a fetch outcome came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataOrigin {
    /// A genuine upstream response.
    Upstream,

    /// A substitute dataset produced by the cascade.
    Substitute(FailureCause),
}

/// A well-formed response together with its origin.
///
/// Shape-identical to a genuine response for rendering, but internally
/// distinguishable for status reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchOutcome<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> FetchOutcome<T> {
    pub fn upstream(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Upstream,
        }
    }

    pub fn substitute(data: T, cause: FailureCause) -> Self {
        Self {
            data,
            origin: DataOrigin::Substitute(cause),
        }
    }

    pub fn is_substitute(&self) -> bool {
        matches!(self.origin, DataOrigin::Substitute(_))
    }
}

/// Apply the cascade policy to an adapter result.
///
/// Upstream conditions (`RateLimited`, `Unavailable`, `NotConfigured`) route
/// to the supplied substitute constructor; `InvalidRequest` and `Internal`
/// pass through as errors.
pub fn cascade<T>(
    result: Result<T, ProviderError>,
    substitute: impl FnOnce(FailureCause) -> T,
) -> Result<FetchOutcome<T>, ProviderError> {
    match result {
        Ok(data) => Ok(FetchOutcome::upstream(data)),
        Err(error) => match error.fallback_class() {
            FallbackClass::Substitute(cause) => {
                Ok(FetchOutcome::substitute(substitute(cause), cause))
            }
            FallbackClass::Surface => Err(error),
        },
    }
}

/// Fixed substitute social posts, dated relative to `now`, most recent first.
pub fn substitute_posts(now: DateTime<Utc>) -> Vec<Post> {
    vec![
        Post {
            id: "fallback-post-1".to_string(),
            text: "Bitcoin holding above key support while volume cools off. \
                   Accumulation range until proven otherwise. #BTC"
                .to_string(),
            username: "chain_gazer".to_string(),
            created_at: now - Duration::minutes(3),
            likes: 142,
            retweets: 38,
            replies: 12,
            sentiment: Some(Sentiment::Positive),
        },
        Post {
            id: "fallback-post-2".to_string(),
            text: "ETH gas back under 10 gwei and L2 volume keeps climbing. \
                   The migration is quietly happening. #Ethereum"
                .to_string(),
            username: "rollup_watch".to_string(),
            created_at: now - Duration::minutes(27),
            likes: 89,
            retweets: 21,
            replies: 7,
            sentiment: Some(Sentiment::Neutral),
        },
        Post {
            id: "fallback-post-3".to_string(),
            text: "Altcoins fading after the weekend pump. Size positions \
                   accordingly, this chop cuts both ways."
                .to_string(),
            username: "perp_walker".to_string(),
            created_at: now - Duration::hours(2),
            likes: 57,
            retweets: 9,
            replies: 15,
            sentiment: Some(Sentiment::Negative),
        },
    ]
}

/// Fixed substitute news articles, dated relative to `now`, most recent first.
pub fn substitute_articles(now: DateTime<Utc>) -> Vec<Article> {
    vec![
        Article {
            id: "fallback-article-1".to_string(),
            title: "Markets steady as traders await macro data".to_string(),
            description: "Majors are trading sideways ahead of this week's \
                          economic releases, with volatility near monthly lows."
                .to_string(),
            source: "Coindash Wire".to_string(),
            url: "https://news.coindash.local/markets-steady".to_string(),
            published_at: now - Duration::minutes(12),
            sentiment: Some(Sentiment::Neutral),
            image: None,
        },
        Article {
            id: "fallback-article-2".to_string(),
            title: "Layer-2 activity hits a new monthly high".to_string(),
            description: "Aggregate rollup throughput continues to outpace \
                          mainnet as fees stay low."
                .to_string(),
            source: "Coindash Wire".to_string(),
            url: "https://news.coindash.local/l2-activity".to_string(),
            published_at: now - Duration::hours(1),
            sentiment: Some(Sentiment::Positive),
            image: None,
        },
        Article {
            id: "fallback-article-3".to_string(),
            title: "Miners rotate reserves ahead of difficulty adjustment".to_string(),
            description: "On-chain flows show reserve movement consistent with \
                          routine treasury management."
                .to_string(),
            source: "Coindash Wire".to_string(),
            url: "https://news.coindash.local/miner-reserves".to_string(),
            published_at: now - Duration::hours(3),
            sentiment: None,
            image: None,
        },
    ]
}
