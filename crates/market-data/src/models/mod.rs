//! Normalized data models shared by all provider adapters.

mod chart;
mod content;
mod instrument;
mod status;

pub use chart::{ChartPoint, ChartSeries, Granularity};
pub use content::{Article, ContentItem, Post, Sentiment};
pub use instrument::Instrument;
pub use status::{ProviderState, ProviderStatus};
