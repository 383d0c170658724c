//! Dashboard orchestration over the provider adapters.
//!
//! One service owns the three upstream adapters, the per-shape caches, and
//! the status tracker. Every read goes through a cache so concurrent
//! clients coalesce into single upstream calls, and every upstream outcome
//! is folded into the status tracker as a side effect of the fetch that
//! produced it - status reporting never issues network calls of its own.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use coindash_market_data::{
    cascade, substitute_articles, substitute_posts, Article, ChartRequest, ChartSeries,
    ContentItem, DataOrigin, FetchOutcome, Instrument, MarketChartProvider, NewsFeedProvider,
    Post, ProviderError, ProviderState, ProviderStatus, SocialFeedProvider, StatusTracker,
};

use crate::cache::FreshnessCache;
use crate::search::{self, SearchHit};

/// Freshness window for chart series.
const CHART_TTL: Duration = Duration::from_secs(60);

/// Freshness window for the market snapshot.
const MARKET_TTL: Duration = Duration::from_secs(30);

/// Freshness window for content feeds.
const CONTENT_TTL: Duration = Duration::from_secs(30);

/// Aggregation service behind the HTTP surface.
pub struct DashboardService {
    charts: Arc<dyn MarketChartProvider>,
    social: Arc<dyn SocialFeedProvider>,
    news: Arc<dyn NewsFeedProvider>,
    status: Arc<StatusTracker>,
    chart_cache: FreshnessCache<ChartSeries>,
    market_cache: FreshnessCache<Vec<Instrument>>,
    post_cache: FreshnessCache<FetchOutcome<Vec<Post>>>,
    article_cache: FreshnessCache<FetchOutcome<Vec<Article>>>,
}

impl DashboardService {
    /// Build the service and seed the status tracker.
    ///
    /// Credentialed providers start as `NoApiKey` when their credential is
    /// absent; everything else starts `Unavailable` until the first fetch
    /// proves otherwise.
    pub fn new(
        charts: Arc<dyn MarketChartProvider>,
        social: Arc<dyn SocialFeedProvider>,
        news: Arc<dyn NewsFeedProvider>,
    ) -> Self {
        let status = Arc::new(StatusTracker::new());
        status.register(charts.id(), ProviderState::Unavailable);
        status.register(social.id(), seed_state(social.is_configured()));
        status.register(news.id(), seed_state(news.is_configured()));

        Self {
            charts,
            social,
            news,
            status,
            chart_cache: FreshnessCache::new(CHART_TTL),
            market_cache: FreshnessCache::new(MARKET_TTL),
            post_cache: FreshnessCache::new(CONTENT_TTL),
            article_cache: FreshnessCache::new(CONTENT_TTL),
        }
    }

    /// Price series for one instrument.
    ///
    /// # Errors
    ///
    /// Chart data has no substitute: upstream failures surface to the
    /// caller once no previously cached series exists for the request.
    pub async fn chart(&self, request: &ChartRequest) -> Result<ChartSeries, Arc<ProviderError>> {
        let provider = self.charts.clone();
        let status = self.status.clone();
        let request_inner = request.clone();

        self.chart_cache
            .get_or_fetch(&request.cache_key(), async move {
                match provider.chart(&request_inner).await {
                    Ok(series) => {
                        status.record_success(provider.id());
                        Ok(series)
                    }
                    Err(error) => {
                        status.record_failure(provider.id(), &error);
                        Err(error)
                    }
                }
            })
            .await
    }

    /// Current market snapshot for the tracked instruments.
    pub async fn markets(&self) -> Result<Vec<Instrument>, Arc<ProviderError>> {
        let provider = self.charts.clone();
        let status = self.status.clone();

        self.market_cache
            .get_or_fetch("markets", async move {
                match provider.markets().await {
                    Ok(instruments) => {
                        status.record_success(provider.id());
                        Ok(instruments)
                    }
                    Err(error) => {
                        status.record_failure(provider.id(), &error);
                        Err(error)
                    }
                }
            })
            .await
    }

    /// Latest social posts, substituted on upstream failure.
    ///
    /// # Errors
    ///
    /// Only `InvalidRequest` and `Internal` surface; upstream conditions
    /// are replaced by the substitute dataset.
    pub async fn social_posts(&self) -> Result<FetchOutcome<Vec<Post>>, Arc<ProviderError>> {
        let provider = self.social.clone();
        let status = self.status.clone();

        self.post_cache
            .get_or_fetch("social-posts", async move {
                let result = provider.latest_posts().await;
                match cascade(result, |_| substitute_posts(Utc::now())) {
                    Ok(outcome) => {
                        record_origin(&status, provider.id(), outcome.origin);
                        Ok(outcome)
                    }
                    Err(error) => {
                        status.record_failure(provider.id(), &error);
                        Err(error)
                    }
                }
            })
            .await
    }

    /// Latest news articles, substituted on upstream failure.
    pub async fn articles(&self) -> Result<FetchOutcome<Vec<Article>>, Arc<ProviderError>> {
        let provider = self.news.clone();
        let status = self.status.clone();

        self.article_cache
            .get_or_fetch("articles", async move {
                let result = provider.latest_articles().await;
                match cascade(result, |_| substitute_articles(Utc::now())) {
                    Ok(outcome) => {
                        record_origin(&status, provider.id(), outcome.origin);
                        Ok(outcome)
                    }
                    Err(error) => {
                        status.record_failure(provider.id(), &error);
                        Err(error)
                    }
                }
            })
            .await
    }

    /// Current status of every registered provider. Never hits the network.
    pub fn provider_statuses(&self) -> BTreeMap<&'static str, ProviderStatus> {
        self.status.snapshot()
    }

    /// All cached content as the unified item type, articles first.
    ///
    /// Content feeds that fail with a surfaced error simply contribute
    /// nothing here.
    pub async fn content_items(&self) -> Vec<ContentItem> {
        let mut items = Vec::new();
        if let Ok(outcome) = self.articles().await {
            items.extend(outcome.data.into_iter().map(ContentItem::Article));
        }
        if let Ok(outcome) = self.social_posts().await {
            items.extend(outcome.data.into_iter().map(ContentItem::Post));
        }
        items
    }

    /// Search instruments and content for `query`.
    pub async fn search(&self, query: &str) -> Vec<SearchHit> {
        // Too-short queries cannot match, so don't touch the upstreams.
        if query.trim().chars().count() < search::MIN_QUERY_LEN {
            return Vec::new();
        }
        let instruments = self.markets().await.unwrap_or_default();
        let content = self.content_items().await;
        search::search(query, &instruments, &content).collect()
    }

    /// Drop every cached value so the next reads hit the upstreams.
    pub fn invalidate_caches(&self) {
        self.chart_cache.clear();
        self.market_cache.clear();
        self.post_cache.clear();
        self.article_cache.clear();
    }
}

fn seed_state(configured: bool) -> ProviderState {
    if configured {
        ProviderState::Unavailable
    } else {
        ProviderState::NoApiKey
    }
}

fn record_origin(status: &StatusTracker, provider: &str, origin: DataOrigin) {
    match origin {
        DataOrigin::Upstream => status.record_success(provider),
        DataOrigin::Substitute(cause) => status.record_substitute(provider, cause),
    }
}
