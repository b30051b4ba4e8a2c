//! Single-slot, read-once store for passing a contractor record from the
//! result list to the detail view.

use std::sync::{Mutex, MutexGuard, PoisonError};

use safecontractor_core::ContractorDetail;
use tracing::debug;

struct Slot {
    key: String,
    payload: ContractorDetail,
}

/// Holds at most one payload. `put` overwrites; `take` empties the slot.
///
/// Share it behind an `Arc` between whatever puts (the search side) and
/// whatever takes (the [`DetailResolver`](crate::DetailResolver)).
#[derive(Default)]
pub struct HandoffStore {
    slot: Mutex<Option<Slot>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `payload` under `key`, replacing whatever was there.
    pub fn put(&self, key: impl Into<String>, payload: ContractorDetail) {
        let key = key.into();
        let mut slot = self.lock();
        if let Some(prev) = slot.as_ref() {
            debug!(previous = %prev.key, key = %key, "replacing handoff payload");
        } else {
            debug!(key = %key, "handoff payload stored");
        }
        *slot = Some(Slot { key, payload });
    }

    /// Remove and return the payload stored under `key`.
    ///
    /// A missing or mismatched key returns `None` and leaves the slot alone.
    pub fn take(&self, key: &str) -> Option<ContractorDetail> {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|s| s.key == key) {
            debug!(key, "handoff payload taken");
            slot.take().map(|s| s.payload)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    /// Key of the stored payload, if any.
    pub fn key(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.key.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn detail(name: &str) -> ContractorDetail {
        ContractorDetail {
            name: name.into(),
            analysis_text: Some(format!("summary for {name}")),
            ..Default::default()
        }
    }

    #[test]
    fn take_is_read_once() {
        let store = HandoffStore::new();
        store.put("Acme Co", detail("Acme Co"));
        assert_eq!(store.take("Acme Co"), Some(detail("Acme Co")));
        assert_eq!(store.take("Acme Co"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn mismatched_key_leaves_slot_untouched() {
        let store = HandoffStore::new();
        store.put("Acme Co", detail("Acme Co"));
        assert_eq!(store.take("Zeta Build"), None);
        assert_eq!(store.key().as_deref(), Some("Acme Co"));
        assert_eq!(store.take("Acme Co"), Some(detail("Acme Co")));
    }

    #[test]
    fn last_write_wins() {
        let store = HandoffStore::new();
        store.put("Acme Co", detail("Acme Co"));
        store.put("Zeta Build", detail("Zeta Build"));
        assert_eq!(store.take("Acme Co"), None);
        assert_eq!(store.take("Zeta Build"), Some(detail("Zeta Build")));
    }

    #[test]
    fn empty_store_takes_nothing() {
        let store = HandoffStore::new();
        assert!(store.is_empty());
        assert_eq!(store.take("Acme Co"), None);
        assert_eq!(store.key(), None);
    }

    #[test]
    fn concurrent_takers_see_payload_once() {
        let store = Arc::new(HandoffStore::new());
        store.put("Acme Co", detail("Acme Co"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.take("Acme Co").is_some())
            })
            .collect();
        let hits = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&taken| taken)
            .count();
        assert_eq!(hits, 1);
    }
}
