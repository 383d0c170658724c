//! Persistent user-defined watchlist ordering.
//!
//! The order is stored as a plain list of instrument ids. Reconciliation
//! against the live instrument set is filter-then-append: persisted ids
//! that no longer exist are dropped, ids not yet in the persisted order are
//! appended in their natural (upstream) position. An unreadable or
//! corrupted store is treated as no saved order rather than an error.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

/// Key the order is persisted under; also the stem of the backing file.
pub const STORAGE_KEY: &str = "coindash.watchlist.order";

#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Merge a persisted order with the live instrument set.
///
/// Keeps the persisted relative order for ids that still exist, drops the
/// rest, and appends live ids the persisted order has never seen.
pub fn reconcile(live: &[String], persisted: &[String]) -> Vec<String> {
    let live_ids: HashSet<&str> = live.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::with_capacity(live.len());

    for id in persisted {
        if live_ids.contains(id.as_str()) && seen.insert(id.as_str()) {
            order.push(id.clone());
        }
    }
    for id in live {
        if seen.insert(id.as_str()) {
            order.push(id.clone());
        }
    }
    order
}

/// Persistence seam for the watchlist order.
pub trait OrderStore: Send + Sync {
    /// Load the saved order, or `None` when absent or unreadable.
    fn load(&self) -> Option<Vec<String>>;

    /// Persist the given order.
    fn save(&self, order: &[String]) -> Result<(), OrderingError>;
}

/// JSON-file-backed order store.
pub struct FileOrderStore {
    path: PathBuf,
}

impl FileOrderStore {
    /// Store the order under `dir`, named after [`STORAGE_KEY`].
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }
}

impl OrderStore for FileOrderStore {
    fn load(&self) -> Option<Vec<String>> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(order) => Some(order),
            Err(error) => {
                warn!(
                    "Ignoring corrupted order file {}: {error}",
                    self.path.display()
                );
                None
            }
        }
    }

    fn save(&self, order: &[String]) -> Result<(), OrderingError> {
        let raw = serde_json::to_string(order)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// The reconciled watchlist order plus its backing store.
pub struct WatchlistOrder<S> {
    store: S,
    order: Vec<String>,
}

impl<S: OrderStore> WatchlistOrder<S> {
    /// Load the saved order and reconcile it against `live`.
    pub fn load(store: S, live: &[String]) -> Self {
        let persisted = store.load().unwrap_or_default();
        Self {
            order: reconcile(live, &persisted),
            store,
        }
    }

    /// Current order, persisted-first then natural.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Re-reconcile against a changed live set and persist the result.
    pub fn sync(&mut self, live: &[String]) -> Result<(), OrderingError> {
        self.order = reconcile(live, &self.order);
        self.store.save(&self.order)
    }

    /// Move the item at `from` to position `to` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::InvalidRequest`] when either index is out
    /// of bounds; the order is left unchanged.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), OrderingError> {
        let len = self.order.len();
        if from >= len || to >= len {
            return Err(OrderingError::InvalidRequest(format!(
                "move {from} -> {to} out of bounds for {len} items"
            )));
        }
        if from != to {
            let id = self.order.remove(from);
            self.order.insert(to, id);
            self.store.save(&self.order)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    /// In-memory store for exercising the order logic without a filesystem.
    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Option<Vec<String>>>,
    }

    impl OrderStore for MemoryStore {
        fn load(&self) -> Option<Vec<String>> {
            self.saved.lock().unwrap().clone()
        }

        fn save(&self, order: &[String]) -> Result<(), OrderingError> {
            *self.saved.lock().unwrap() = Some(order.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_reconcile_keeps_persisted_order() {
        let live = ids(&["a", "b", "c"]);
        let persisted = ids(&["c", "a"]);
        assert_eq!(reconcile(&live, &persisted), ids(&["c", "a", "b"]));
    }

    #[test]
    fn test_reconcile_drops_vanished_ids() {
        let live = ids(&["a"]);
        let persisted = ids(&["a", "b"]);
        assert_eq!(reconcile(&live, &persisted), ids(&["a"]));
    }

    #[test]
    fn test_reconcile_deduplicates_persisted() {
        let live = ids(&["a", "b"]);
        let persisted = ids(&["b", "b", "a"]);
        assert_eq!(reconcile(&live, &persisted), ids(&["b", "a"]));
    }

    #[test]
    fn test_reconcile_with_empty_persisted_is_natural_order() {
        let live = ids(&["a", "b", "c"]);
        assert_eq!(reconcile(&live, &[]), live);
    }

    #[test]
    fn test_move_item_persists() {
        let live = ids(&["a", "b", "c"]);
        let mut order = WatchlistOrder::load(MemoryStore::default(), &live);

        order.move_item(2, 0).unwrap();
        assert_eq!(order.ids(), ids(&["c", "a", "b"]));
        assert_eq!(order.store.load(), Some(ids(&["c", "a", "b"])));
    }

    #[test]
    fn test_move_item_out_of_bounds_leaves_order_unchanged() {
        let live = ids(&["a", "b"]);
        let mut order = WatchlistOrder::load(MemoryStore::default(), &live);

        let error = order.move_item(0, 5).unwrap_err();
        assert!(matches!(error, OrderingError::InvalidRequest(_)));
        assert_eq!(order.ids(), ids(&["a", "b"]));
        assert_eq!(order.store.load(), None);
    }

    #[test]
    fn test_move_item_to_same_position_skips_save() {
        let live = ids(&["a", "b"]);
        let mut order = WatchlistOrder::load(MemoryStore::default(), &live);

        order.move_item(1, 1).unwrap();
        assert_eq!(order.store.load(), None);
    }

    #[test]
    fn test_sync_appends_new_live_ids() {
        let live = ids(&["a", "b"]);
        let mut order = WatchlistOrder::load(MemoryStore::default(), &live);
        order.move_item(1, 0).unwrap();

        order.sync(&ids(&["a", "b", "c"])).unwrap();
        assert_eq!(order.ids(), ids(&["b", "a", "c"]));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOrderStore::new(dir.path());

        assert_eq!(store.load(), None);
        store.save(&ids(&["a", "b"])).unwrap();
        assert_eq!(store.load(), Some(ids(&["a", "b"])));
    }

    #[test]
    fn test_corrupted_file_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("{STORAGE_KEY}.json"));
        fs::write(&path, "not json{").unwrap();

        let store = FileOrderStore::new(dir.path());
        assert_eq!(store.load(), None);

        let live = ids(&["a", "b"]);
        let order = WatchlistOrder::load(store, &live);
        assert_eq!(order.ids(), live);
    }
}
