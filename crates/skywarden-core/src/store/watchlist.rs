// ── Device watchlist ──
//
// MAC-keyed set of tracked devices. Per-key mutation is atomic through the
// DashMap entry API, which is what keeps the auto-watch policy from
// double-adding a device under concurrent ingestion.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::model::{MacAddress, WatchlistEntry};

#[derive(Default)]
pub struct Watchlist {
    entries: DashMap<MacAddress, Arc<WatchlistEntry>>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, mac: &MacAddress) -> bool {
        self.entries.contains_key(mac)
    }

    pub fn get(&self, mac: &MacAddress) -> Option<Arc<WatchlistEntry>> {
        self.entries.get(mac).map(|r| Arc::clone(r.value()))
    }

    /// Insert or replace (operator adds may refresh name/phy).
    /// Returns `true` if the key was new.
    pub fn upsert(&self, entry: WatchlistEntry) -> bool {
        self.entries
            .insert(entry.mac.clone(), Arc::new(entry))
            .is_none()
    }

    /// Insert only when absent; `make` runs only on insert. Returns `true`
    /// if this call created the entry.
    pub fn insert_if_absent(
        &self,
        mac: MacAddress,
        make: impl FnOnce() -> WatchlistEntry,
    ) -> bool {
        match self.entries.entry(mac) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(make()));
                true
            }
        }
    }

    /// Remove by identifier. Returns the removed entry if it existed.
    pub fn remove(&self, mac: &MacAddress) -> Option<Arc<WatchlistEntry>> {
        self.entries.remove(mac).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, newest additions first (ties broken by identifier for
    /// a stable order).
    pub fn snapshot(&self) -> Vec<Arc<WatchlistEntry>> {
        let mut all: Vec<_> = self.entries.iter().map(|r| Arc::clone(r.value())).collect();
        all.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| a.mac.as_str().cmp(b.mac.as_str()))
        });
        all
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::WatchOrigin;
    use chrono::Utc;

    fn entry(mac: &str, origin: WatchOrigin) -> WatchlistEntry {
        WatchlistEntry {
            mac: MacAddress::new(mac),
            name: mac.to_owned(),
            phy: "IEEE802.11".into(),
            added_at: Utc::now(),
            origin,
        }
    }

    #[test]
    fn insert_if_absent_never_double_adds() {
        let list = Watchlist::new();
        let mac = MacAddress::new("AA:BB:CC:11:22:33");

        assert!(list.insert_if_absent(mac.clone(), || {
            entry("AA:BB:CC:11:22:33", WatchOrigin::Automatic)
        }));
        assert!(!list.insert_if_absent(mac.clone(), || {
            entry("AA:BB:CC:11:22:33", WatchOrigin::Automatic)
        }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn formats_collide_to_one_entry() {
        let list = Watchlist::new();
        list.upsert(entry("60:60:1F:AA:BB:CC", WatchOrigin::Manual));
        assert!(!list.upsert(entry("60-60-1f-aa-bb-cc", WatchOrigin::Manual)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_returns_entry() {
        let list = Watchlist::new();
        list.upsert(entry("AA:BB:CC:11:22:33", WatchOrigin::Manual));

        let mac = MacAddress::new("AA:BB:CC:11:22:33");
        let removed = list.remove(&mac).unwrap();
        assert_eq!(removed.mac, mac);
        assert!(list.is_empty());
        assert!(list.remove(&mac).is_none());
    }

    #[test]
    fn upsert_replaces_but_reports_existing() {
        let list = Watchlist::new();
        assert!(list.upsert(entry("AA:BB:CC:11:22:33", WatchOrigin::Automatic)));

        let mut renamed = entry("AA:BB:CC:11:22:33", WatchOrigin::Manual);
        renamed.name = "Lab AP".into();
        assert!(!list.upsert(renamed));

        let got = list.get(&MacAddress::new("AA:BB:CC:11:22:33")).unwrap();
        assert_eq!(got.name, "Lab AP");
        assert_eq!(got.origin, WatchOrigin::Manual);
    }
}
