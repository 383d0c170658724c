use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health state of one configured provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderState {
    /// Most recent outcome was a genuine upstream response.
    Connected,

    /// Most recent outcome was a substitution due to rate limiting or an
    /// outage - the provider is configured but temporarily failing.
    Degraded,

    /// No successful outcome yet, or the last attempt hit an unexpected
    /// local fault.
    Unavailable,

    /// The provider's credential was never configured; callers receive
    /// fallback data.
    NoApiKey,
}

/// Provider health snapshot entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub state: ProviderState,

    /// When the state was last updated by an adapter outcome.
    pub checked_at: DateTime<Utc>,
}

impl ProviderStatus {
    pub fn new(state: ProviderState) -> Self {
        Self {
            state,
            checked_at: Utc::now(),
        }
    }
}
