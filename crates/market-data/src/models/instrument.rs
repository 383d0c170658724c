use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized market snapshot for one tradeable coin.
///
/// Created or refreshed as a whole on each successful market fetch and
/// immutable between refreshes - a newer snapshot replaces the old one,
/// nothing is mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Canonical upstream identifier (e.g., "bitcoin")
    pub id: String,

    /// Display name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol (e.g., "btc")
    pub symbol: String,

    /// Current price in the quote currency
    pub price: Decimal,

    /// Trading volume over the last 24 hours
    pub volume_24h: Decimal,

    /// Percent change over the last 24 hours
    pub change_24h: Decimal,

    /// Logo/image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Instrument {
    /// Create a new instrument with required fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        price: Decimal,
        volume_24h: Decimal,
        change_24h: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            price,
            volume_24h,
            change_24h,
            image: None,
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
