//! CryptoPanic provider for crypto news articles.
//!
//! Fetches the public news feed and derives a sentiment tag from community
//! votes. Requires an auth token; an absent token fails fast with
//! `NotConfigured` and no network call.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{Article, Sentiment};
use crate::provider::{classify_status, NewsFeedProvider};

/// Provider ID constant
pub const PROVIDER_ID: &str = "CRYPTOPANIC";

const BASE_URL: &str = "https://cryptopanic.com/api/v1";

/// Currencies the feed is filtered to
const CURRENCIES: &str = "BTC,ETH";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    results: Vec<NewsDto>,
}

#[derive(Debug, Deserialize)]
struct NewsDto {
    id: u64,
    title: String,
    url: String,
    published_at: DateTime<Utc>,
    source: SourceDto,
    #[serde(default)]
    votes: VotesDto,
    #[serde(default)]
    metadata: Option<MetadataDto>,
}

#[derive(Debug, Deserialize)]
struct SourceDto {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct VotesDto {
    #[serde(default)]
    positive: u32,
    #[serde(default)]
    negative: u32,
}

#[derive(Debug, Deserialize)]
struct MetadataDto {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

/// CryptoPanic provider for crypto news articles.
pub struct CryptoPanicProvider {
    client: Client,
    auth_token: Option<String>,
}

impl CryptoPanicProvider {
    /// Create a new CryptoPanic provider. A `None` token means the provider
    /// is present but unconfigured.
    pub fn new(auth_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, auth_token }
    }
}

/// Sentiment from community votes; unvoted items carry no tag.
fn sentiment_from_votes(votes: &VotesDto) -> Option<Sentiment> {
    if votes.positive == 0 && votes.negative == 0 {
        return None;
    }
    Some(match votes.positive.cmp(&votes.negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    })
}

fn article_from_news(news: NewsDto) -> Article {
    let sentiment = sentiment_from_votes(&news.votes);
    let (description, image) = match news.metadata {
        Some(meta) => (meta.description.unwrap_or_default(), meta.image),
        None => (String::new(), None),
    };
    Article {
        id: news.id.to_string(),
        title: news.title,
        description,
        source: news.source.title,
        url: news.url,
        published_at: news.published_at,
        sentiment,
        image,
    }
}

#[async_trait]
impl NewsFeedProvider for CryptoPanicProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn is_configured(&self) -> bool {
        self.auth_token.is_some()
    }

    async fn latest_articles(&self) -> Result<Vec<Article>, ProviderError> {
        let Some(token) = &self.auth_token else {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER_ID.to_string(),
            });
        };

        let url = format!(
            "{}/posts/?auth_token={}&public=true&currencies={}",
            BASE_URL, token, CURRENCIES,
        );

        debug!("Fetching news feed from CryptoPanic");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(PROVIDER_ID, e))?;

        if let Some(error) = classify_status(PROVIDER_ID, response.status()) {
            return Err(error);
        }

        let body: PostsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("malformed response body: {e}"),
            })?;

        Ok(body.results.into_iter().map(article_from_news).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_fails_fast() {
        let provider = CryptoPanicProvider::new(None);
        assert!(!provider.is_configured());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let error = runtime.block_on(provider.latest_articles()).unwrap_err();
        assert!(matches!(error, ProviderError::NotConfigured { .. }));
    }

    #[test]
    fn test_sentiment_from_votes() {
        let positive = VotesDto {
            positive: 5,
            negative: 1,
        };
        assert_eq!(sentiment_from_votes(&positive), Some(Sentiment::Positive));

        let negative = VotesDto {
            positive: 1,
            negative: 4,
        };
        assert_eq!(sentiment_from_votes(&negative), Some(Sentiment::Negative));

        let split = VotesDto {
            positive: 2,
            negative: 2,
        };
        assert_eq!(sentiment_from_votes(&split), Some(Sentiment::Neutral));

        let unvoted = VotesDto::default();
        assert_eq!(sentiment_from_votes(&unvoted), None);
    }

    #[test]
    fn test_article_from_news() {
        let raw = r#"{
            "id": 123456,
            "title": "Bitcoin rallies past resistance",
            "url": "https://cryptopanic.com/news/123456",
            "published_at": "2024-05-01T09:30:00Z",
            "source": {"title": "CoinDesk"},
            "votes": {"positive": 12, "negative": 2},
            "metadata": {"description": "BTC breaks out on volume"}
        }"#;
        let news: NewsDto = serde_json::from_str(raw).unwrap();
        let article = article_from_news(news);
        assert_eq!(article.id, "123456");
        assert_eq!(article.source, "CoinDesk");
        assert_eq!(article.description, "BTC breaks out on volume");
        assert_eq!(article.sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn test_article_from_news_without_metadata() {
        let raw = r#"{
            "id": 7,
            "title": "ETH upgrade scheduled",
            "url": "https://cryptopanic.com/news/7",
            "published_at": "2024-05-01T09:30:00Z",
            "source": {"title": "The Block"}
        }"#;
        let news: NewsDto = serde_json::from_str(raw).unwrap();
        let article = article_from_news(news);
        assert_eq!(article.description, "");
        assert_eq!(article.sentiment, None);
        assert!(article.image.is_none());
    }
}
