use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use coindash_core::DashboardService;
use coindash_market_data::{
    CoinGeckoProvider, CryptoPanicProvider, MarketChartProvider, NewsFeedProvider,
    SocialFeedProvider, TwitterProvider,
};

use crate::config::Config;

pub struct AppState {
    pub dashboard: Arc<DashboardService>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let charts: Arc<dyn MarketChartProvider> =
        Arc::new(CoinGeckoProvider::new(config.coingecko_api_key.clone()));
    let social: Arc<dyn SocialFeedProvider> =
        Arc::new(TwitterProvider::new(config.twitter_bearer_token.clone()));
    let news: Arc<dyn NewsFeedProvider> = Arc::new(CryptoPanicProvider::new(
        config.cryptopanic_auth_token.clone(),
    ));

    Arc::new(AppState {
        dashboard: Arc::new(DashboardService::new(charts, social, news)),
    })
}
