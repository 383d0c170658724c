//! Aggregate provider status tracking.
//!
//! Keeps one status cell per registered provider and folds fetch outcomes
//! into it. The tracker only ever reports providers that were explicitly
//! registered at construction time; updates for unknown ids are logged and
//! dropped, so a snapshot can never contain a provider the service does not
//! own.

use std::collections::BTreeMap;
use std::sync::RwLock;

use log::warn;

use crate::errors::{FailureCause, ProviderError};
use crate::models::{ProviderState, ProviderStatus};

/// Thread-safe registry of per-provider health.
pub struct StatusTracker {
    statuses: RwLock<BTreeMap<&'static str, ProviderStatus>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            statuses: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a provider with its initial state. Registration is the only
    /// way a provider enters the tracker.
    pub fn register(&self, provider: &'static str, initial: ProviderState) {
        let mut statuses = self.statuses.write().unwrap();
        statuses.insert(provider, ProviderStatus::new(initial));
    }

    /// Record a successful upstream fetch.
    pub fn record_success(&self, provider: &str) {
        self.update(provider, ProviderState::Connected);
    }

    /// Record that a substitute dataset was served in place of upstream data.
    pub fn record_substitute(&self, provider: &str, cause: FailureCause) {
        let state = match cause {
            FailureCause::NotConfigured => ProviderState::NoApiKey,
            FailureCause::RateLimited | FailureCause::Unavailable => ProviderState::Degraded,
        };
        self.update(provider, state);
    }

    /// Record a fetch failure that was surfaced to the caller.
    ///
    /// `InvalidRequest` says nothing about provider health and is ignored.
    pub fn record_failure(&self, provider: &str, error: &ProviderError) {
        let state = match error {
            ProviderError::InvalidRequest(_) => return,
            ProviderError::RateLimited { .. } | ProviderError::Unavailable { .. } => {
                ProviderState::Degraded
            }
            ProviderError::NotConfigured { .. } => ProviderState::NoApiKey,
            ProviderError::Internal(_) => ProviderState::Unavailable,
        };
        self.update(provider, state);
    }

    /// Current status of every registered provider.
    pub fn snapshot(&self) -> BTreeMap<&'static str, ProviderStatus> {
        self.statuses.read().unwrap().clone()
    }

    fn update(&self, provider: &str, state: ProviderState) {
        let mut statuses = self.statuses.write().unwrap();
        match statuses.get_mut(provider) {
            Some(status) => *status = ProviderStatus::new(state),
            None => warn!("Ignoring status update for unregistered provider '{provider}'"),
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_snapshot() {
        let tracker = StatusTracker::new();
        tracker.register("COINGECKO", ProviderState::Unavailable);
        tracker.register("TWITTER", ProviderState::NoApiKey);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["COINGECKO"].state, ProviderState::Unavailable);
        assert_eq!(snapshot["TWITTER"].state, ProviderState::NoApiKey);
    }

    #[test]
    fn test_success_marks_connected() {
        let tracker = StatusTracker::new();
        tracker.register("COINGECKO", ProviderState::Unavailable);
        tracker.record_success("COINGECKO");
        assert_eq!(
            tracker.snapshot()["COINGECKO"].state,
            ProviderState::Connected
        );
    }

    #[test]
    fn test_substitute_marks_degraded_or_no_api_key() {
        let tracker = StatusTracker::new();
        tracker.register("TWITTER", ProviderState::Unavailable);

        tracker.record_substitute("TWITTER", FailureCause::RateLimited);
        assert_eq!(tracker.snapshot()["TWITTER"].state, ProviderState::Degraded);

        tracker.record_substitute("TWITTER", FailureCause::NotConfigured);
        assert_eq!(tracker.snapshot()["TWITTER"].state, ProviderState::NoApiKey);
    }

    #[test]
    fn test_failure_mapping() {
        let tracker = StatusTracker::new();
        tracker.register("COINGECKO", ProviderState::Connected);

        tracker.record_failure(
            "COINGECKO",
            &ProviderError::RateLimited {
                provider: "COINGECKO".to_string(),
            },
        );
        assert_eq!(
            tracker.snapshot()["COINGECKO"].state,
            ProviderState::Degraded
        );

        tracker.record_failure("COINGECKO", &ProviderError::Internal("boom".to_string()));
        assert_eq!(
            tracker.snapshot()["COINGECKO"].state,
            ProviderState::Unavailable
        );
    }

    #[test]
    fn test_invalid_request_does_not_change_state() {
        let tracker = StatusTracker::new();
        tracker.register("COINGECKO", ProviderState::Connected);
        tracker.record_failure(
            "COINGECKO",
            &ProviderError::InvalidRequest("days must be positive".to_string()),
        );
        assert_eq!(
            tracker.snapshot()["COINGECKO"].state,
            ProviderState::Connected
        );
    }

    #[test]
    fn test_unregistered_updates_are_dropped() {
        let tracker = StatusTracker::new();
        tracker.register("COINGECKO", ProviderState::Connected);
        tracker.record_success("MYSTERY");
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.contains_key("MYSTERY"));
    }

    #[test]
    fn test_update_refreshes_checked_at() {
        let tracker = StatusTracker::new();
        tracker.register("COINGECKO", ProviderState::Unavailable);
        let before = tracker.snapshot()["COINGECKO"].checked_at;
        tracker.record_success("COINGECKO");
        let after = tracker.snapshot()["COINGECKO"].checked_at;
        assert!(after >= before);
    }
}
