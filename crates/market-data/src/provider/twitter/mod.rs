//! Twitter provider for crypto social posts.
//!
//! Fetches recent posts about the tracked markets via the v2 recent-search
//! endpoint. Requires a bearer token; when the token is absent every call
//! fails fast with `NotConfigured` and no network request is made, which
//! routes callers to the fallback dataset.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::Post;
use crate::provider::{classify_status, SocialFeedProvider};

/// Provider ID constant
pub const PROVIDER_ID: &str = "TWITTER";

const BASE_URL: &str = "https://api.twitter.com/2";

/// Search query for the recent-search endpoint
const SEARCH_QUERY: &str = "(bitcoin OR ethereum OR crypto) -is:retweet lang:en";

/// Number of posts requested per fetch
const MAX_RESULTS: u32 = 10;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RecentSearchResponse {
    #[serde(default)]
    data: Vec<TweetDto>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<UserDto>,
}

#[derive(Debug, Deserialize)]
struct TweetDto {
    id: String,
    text: String,
    author_id: String,
    created_at: DateTime<Utc>,
    public_metrics: TweetMetrics,
}

#[derive(Debug, Deserialize)]
struct TweetMetrics {
    like_count: u64,
    retweet_count: u64,
    reply_count: u64,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
    username: String,
}

/// Twitter provider for crypto social posts.
pub struct TwitterProvider {
    client: Client,
    bearer_token: Option<String>,
}

impl TwitterProvider {
    /// Create a new Twitter provider. A `None` token means the provider is
    /// present but unconfigured.
    pub fn new(bearer_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            bearer_token,
        }
    }
}

/// Flatten the response into normalized posts, joining authors by id.
fn posts_from_response(body: RecentSearchResponse) -> Vec<Post> {
    let usernames: HashMap<&str, &str> = body
        .includes
        .users
        .iter()
        .map(|user| (user.id.as_str(), user.username.as_str()))
        .collect();

    body.data
        .into_iter()
        .map(|tweet| {
            let username = usernames
                .get(tweet.author_id.as_str())
                .copied()
                .unwrap_or("unknown")
                .to_string();
            Post {
                id: tweet.id,
                text: tweet.text,
                username,
                created_at: tweet.created_at,
                likes: tweet.public_metrics.like_count,
                retweets: tweet.public_metrics.retweet_count,
                replies: tweet.public_metrics.reply_count,
                sentiment: None,
            }
        })
        .collect()
}

#[async_trait]
impl SocialFeedProvider for TwitterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn is_configured(&self) -> bool {
        self.bearer_token.is_some()
    }

    async fn latest_posts(&self) -> Result<Vec<Post>, ProviderError> {
        let Some(token) = &self.bearer_token else {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER_ID.to_string(),
            });
        };

        let url = format!(
            "{}/tweets/search/recent?query={}&max_results={}&tweet.fields=created_at,public_metrics,author_id&expansions=author_id&user.fields=username",
            BASE_URL,
            urlencoding::encode(SEARCH_QUERY),
            MAX_RESULTS,
        );

        debug!("Fetching recent posts from Twitter");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(PROVIDER_ID, e))?;

        if let Some(error) = classify_status(PROVIDER_ID, response.status()) {
            return Err(error);
        }

        let body: RecentSearchResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Unavailable {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("malformed response body: {e}"),
                })?;

        Ok(posts_from_response(body))
    }
}
