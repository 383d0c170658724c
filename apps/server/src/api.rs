use std::sync::Arc;

use axum::http::{header, HeaderName, Method, StatusCode};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use coindash_core::SearchHit;
use coindash_market_data::{Article, ChartRequest, ChartSeries, Instrument, Post, ProviderError};

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

pub async fn healthz() -> &'static str {
    "ok"
}

// ===================== Chart =====================

#[derive(Deserialize)]
struct ChartParams {
    days: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartResponse {
    coin_id: String,
    days: u32,
    data: Vec<ChartPointDto>,
}

#[derive(Serialize)]
struct ChartPointDto {
    time: DateTime<Utc>,
    price: Decimal,
}

impl From<ChartSeries> for ChartResponse {
    fn from(series: ChartSeries) -> Self {
        Self {
            coin_id: series.coin_id,
            days: series.days,
            data: series
                .points
                .into_iter()
                .map(|point| ChartPointDto {
                    time: point.time,
                    price: point.price,
                })
                .collect(),
        }
    }
}

/// Price series for one instrument.
///
/// Upstream failures keep the response shape: the body is the usual chart
/// envelope with an empty `data` array, under 429 for rate limiting and
/// 500 for everything else.
async fn get_chart(
    Path(id): Path<String>,
    Query(params): Query<ChartParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<ChartResponse>)> {
    let days_raw = params.days.unwrap_or_else(|| "7".to_string());
    let days: u32 = days_raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid days parameter: '{days_raw}'")))?;
    let request =
        ChartRequest::new(id.clone(), days).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match state.dashboard.chart(&request).await {
        Ok(series) => Ok((StatusCode::OK, Json(ChartResponse::from(series)))),
        Err(error) => {
            tracing::warn!("Chart fetch for '{id}' failed: {error}");
            let status = match *error {
                ProviderError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Ok((
                status,
                Json(ChartResponse {
                    coin_id: id,
                    days,
                    data: vec![],
                }),
            ))
        }
    }
}

// ===================== Content feeds =====================

/// Latest social posts. Substitution happens below this layer, so the only
/// non-200 outcome is an internal failure, which still carries a
/// well-formed (empty) array.
async fn get_social_posts(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Vec<Post>>) {
    match state.dashboard.social_posts().await {
        Ok(outcome) => (StatusCode::OK, Json(outcome.data)),
        Err(error) => {
            tracing::error!("Social post fetch failed: {error}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![]))
        }
    }
}

/// Latest news articles, same contract as the social feed.
async fn get_news(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Vec<Article>>) {
    match state.dashboard.articles().await {
        Ok(outcome) => (StatusCode::OK, Json(outcome.data)),
        Err(error) => {
            tracing::error!("News fetch failed: {error}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![]))
        }
    }
}

// ===================== Status =====================

/// Aggregate provider status. Reads the tracker only - no network calls.
async fn get_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let snapshot = state.dashboard.provider_statuses();

    let mut body = serde_json::Map::new();
    let mut last_update: Option<DateTime<Utc>> = None;
    for (id, status) in snapshot {
        let state_value = serde_json::to_value(status.state)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        body.insert(id.to_lowercase(), state_value);
        last_update = Some(match last_update {
            Some(t) if t > status.checked_at => t,
            _ => status.checked_at,
        });
    }
    body.insert(
        "lastUpdate".to_string(),
        json!(last_update.unwrap_or_else(Utc::now).to_rfc3339()),
    );
    Ok(Json(Value::Object(body)))
}

// ===================== Markets and search =====================

async fn get_markets(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Vec<Instrument>>) {
    match state.dashboard.markets().await {
        Ok(instruments) => (StatusCode::OK, Json(instruments)),
        Err(error) => {
            tracing::warn!("Market snapshot fetch failed: {error}");
            let status = match *error {
                ProviderError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(vec![]))
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn get_search(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SearchHit>> {
    Json(state.dashboard.search(&params.q).await)
}

// ===================== Webhook =====================

#[derive(Deserialize)]
struct WebhookPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    #[allow(dead_code)]
    data: Value,
}

/// Acknowledge an external event. A `refresh` event drops every cached
/// value so the next reads hit the upstreams.
async fn post_webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WebhookPayload>,
) -> Json<Value> {
    if payload.kind == "refresh" {
        tracing::info!("Webhook requested a cache refresh");
        state.dashboard.invalidate_caches();
    }
    Json(json!({
        "success": true,
        "message": format!("Processed '{}' event", payload.kind),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ===================== Router =====================

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse().unwrap())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };
    let cors = cors
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/chart/{id}", get(get_chart))
        .route("/social-posts", get(get_social_posts))
        .route("/news", get(get_news))
        .route("/status", get(get_status))
        .route("/markets", get(get_markets))
        .route("/search", get(get_search))
        .route("/webhook", post(post_webhook))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
