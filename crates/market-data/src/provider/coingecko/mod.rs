//! CoinGecko provider for cryptocurrency market data.
//!
//! Serves two shapes: per-instrument price charts (`/coins/{id}/market_chart`)
//! and the market snapshot for the tracked coins (`/coins/markets`).
//! Works without a credential; a demo API key, when present, raises the
//! upstream rate limits.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{ChartPoint, ChartSeries, Instrument};
use crate::provider::{classify_status, ChartRequest, MarketChartProvider};

/// Provider ID constant
pub const PROVIDER_ID: &str = "COINGECKO";

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for all requests
const VS_CURRENCY: &str = "usd";

/// Page size for the market snapshot
const MARKETS_PER_PAGE: u32 = 50;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API response from `/coins/{id}/market_chart`
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[unix_millis, price]` pairs ordered by timestamp ascending
    prices: Vec<(i64, f64)>,
}

/// One entry of the `/coins/markets` response
#[derive(Debug, Deserialize)]
struct MarketCoin {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<f64>,
    total_volume: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    image: Option<String>,
}

/// CoinGecko provider for cryptocurrency market data.
pub struct CoinGeckoProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Create a new CoinGecko provider. The API key is optional.
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(PROVIDER_ID, e))?;

        if let Some(error) = classify_status(PROVIDER_ID, response.status()) {
            return Err(error);
        }

        response.json::<T>().await.map_err(|e| {
            ProviderError::Unavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("malformed response body: {e}"),
            }
        })
    }
}

/// Convert one `[unix_millis, price]` pair into a chart point.
///
/// Pairs with out-of-range timestamps or non-finite prices are dropped
/// rather than failing the whole series.
fn point_from_pair(millis: i64, price: f64) -> Option<ChartPoint> {
    let time = DateTime::from_timestamp_millis(millis)?;
    let price = Decimal::try_from(price).ok()?;
    Some(ChartPoint { time, price })
}

fn instrument_from_market(coin: MarketCoin) -> Instrument {
    let price = coin
        .current_price
        .and_then(|p| Decimal::try_from(p).ok())
        .unwrap_or(Decimal::ZERO);
    let volume = coin
        .total_volume
        .and_then(|v| Decimal::try_from(v).ok())
        .unwrap_or(Decimal::ZERO);
    let change = coin
        .price_change_percentage_24h
        .and_then(|c| Decimal::try_from(c).ok())
        .unwrap_or(Decimal::ZERO);

    let mut instrument =
        Instrument::new(coin.id, coin.name, coin.symbol, price, volume, change);
    if let Some(image) = coin.image {
        instrument = instrument.with_image(image);
    }
    instrument
}

#[async_trait]
impl MarketChartProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn chart(&self, request: &ChartRequest) -> Result<ChartSeries, ProviderError> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval={}",
            self.base_url,
            request.coin_id(),
            VS_CURRENCY,
            request.days(),
            request.granularity().as_interval(),
        );

        debug!(
            "Fetching {} chart for '{}' ({} days)",
            request.granularity().as_interval(),
            request.coin_id(),
            request.days()
        );

        let body: MarketChartResponse = self.get_json(&url).await?;

        let total = body.prices.len();
        let points: Vec<ChartPoint> = body
            .prices
            .into_iter()
            .filter_map(|(millis, price)| point_from_pair(millis, price))
            .collect();
        if points.len() < total {
            warn!(
                "Dropped {} unparseable samples from '{}' chart",
                total - points.len(),
                request.coin_id()
            );
        }

        Ok(ChartSeries {
            coin_id: request.coin_id().to_string(),
            days: request.days(),
            granularity: request.granularity(),
            points,
        })
    }

    async fn markets(&self) -> Result<Vec<Instrument>, ProviderError> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1",
            self.base_url, VS_CURRENCY, MARKETS_PER_PAGE,
        );

        let coins: Vec<MarketCoin> = self.get_json(&url).await?;
        Ok(coins.into_iter().map(instrument_from_market).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_provider_id() {
        let provider = CoinGeckoProvider::new(None);
        assert_eq!(provider.id(), "COINGECKO");
    }

    #[test]
    fn test_parse_market_chart_response() {
        let raw = r#"{"prices":[[1714521600000,63420.5],[1714608000000,64102.1]],
            "market_caps":[],"total_volumes":[]}"#;
        let body: MarketChartResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.prices.len(), 2);
        assert_eq!(body.prices[0].0, 1714521600000);
    }

    #[test]
    fn test_point_from_pair() {
        let point = point_from_pair(1714521600000, 63420.5).unwrap();
        assert_eq!(point.price, dec!(63420.5));
        assert_eq!(point.time.timestamp_millis(), 1714521600000);
    }

    #[test]
    fn test_point_from_pair_rejects_non_finite() {
        assert!(point_from_pair(1714521600000, f64::NAN).is_none());
        assert!(point_from_pair(1714521600000, f64::INFINITY).is_none());
    }

    #[test]
    fn test_instrument_from_market() {
        let raw = r#"{"id":"bitcoin","symbol":"btc","name":"Bitcoin",
            "current_price":64250.12,"total_volume":28100000000.0,
            "price_change_percentage_24h":-1.8,
            "image":"https://assets.coingecko.com/coins/images/1/large/bitcoin.png"}"#;
        let coin: MarketCoin = serde_json::from_str(raw).unwrap();
        let instrument = instrument_from_market(coin);
        assert_eq!(instrument.id, "bitcoin");
        assert_eq!(instrument.price, dec!(64250.12));
        assert_eq!(instrument.change_24h, dec!(-1.8));
        assert!(instrument.image.is_some());
    }

    #[test]
    fn test_instrument_from_market_tolerates_nulls() {
        let raw = r#"{"id":"newcoin","symbol":"new","name":"New Coin",
            "current_price":null,"total_volume":null,
            "price_change_percentage_24h":null,"image":null}"#;
        let coin: MarketCoin = serde_json::from_str(raw).unwrap();
        let instrument = instrument_from_market(coin);
        assert_eq!(instrument.price, Decimal::ZERO);
        assert!(instrument.image.is_none());
    }
}
