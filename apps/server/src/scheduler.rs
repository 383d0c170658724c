//! Background refresh scheduler.
//!
//! Keeps the market and content caches warm so client reads are served
//! from fresh data instead of paying the upstream latency themselves.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Refresh interval, aligned with the cache freshness windows
const REFRESH_INTERVAL_SECS: u64 = 30;

/// Initial delay before the first refresh to let the server start
const INITIAL_DELAY_SECS: u64 = 1;

/// Starts the background refresh scheduler.
pub fn start_refresh_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Refresh scheduler started ({REFRESH_INTERVAL_SECS}s interval)");

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut refresh_interval = interval(Duration::from_secs(REFRESH_INTERVAL_SECS));
        loop {
            refresh_interval.tick().await;
            run_scheduled_refresh(&state).await;
        }
    });
}

/// Runs one refresh pass over every data kind.
///
/// Failures are logged and the pass continues: each kind refreshes
/// independently and a substituted feed still counts as warm.
async fn run_scheduled_refresh(state: &Arc<AppState>) {
    if let Err(error) = state.dashboard.markets().await {
        warn!("Scheduled market refresh failed: {error}");
    }
    if let Err(error) = state.dashboard.social_posts().await {
        warn!("Scheduled social feed refresh failed: {error}");
    }
    if let Err(error) = state.dashboard.articles().await {
        warn!("Scheduled news refresh failed: {error}");
    }
}
