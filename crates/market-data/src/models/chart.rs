use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sampling granularity for a chart series.
///
/// Derived from the requested day range with a fixed, deterministic rule:
/// a range of exactly one day samples hourly, anything larger samples daily.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hourly,
    Daily,
}

impl Granularity {
    /// Granularity for a requested day range.
    pub const fn for_days(days: u32) -> Self {
        if days == 1 {
            Self::Hourly
        } else {
            Self::Daily
        }
    }

    /// Interval parameter value understood by chart upstreams.
    pub const fn as_interval(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

/// A single (timestamp, price) sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Sample timestamp
    pub time: DateTime<Utc>,

    /// Price at that moment
    pub price: Decimal,
}

/// Ordered price series for one instrument.
///
/// Regenerated per request, never mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Instrument the series belongs to
    pub coin_id: String,

    /// Requested day range
    pub days: u32,

    /// Sampling granularity derived from the day range
    pub granularity: Granularity,

    /// Samples ordered by timestamp ascending
    pub points: Vec<ChartPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_day_is_hourly() {
        assert_eq!(Granularity::for_days(1), Granularity::Hourly);
    }

    #[test]
    fn test_larger_ranges_are_daily() {
        for days in [7, 14, 30, 90] {
            assert_eq!(Granularity::for_days(days), Granularity::Daily);
        }
    }

    #[test]
    fn test_interval_values() {
        assert_eq!(Granularity::Hourly.as_interval(), "hourly");
        assert_eq!(Granularity::Daily.as_interval(), "daily");
    }
}
