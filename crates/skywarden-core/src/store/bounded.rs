// ── Generic bounded record log ──
//
// Newest-first trail of side-effect outcomes (alert saves, batch exports).
// Same locking discipline as the alert log, without id bookkeeping.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

pub(crate) struct BoundedLog<T> {
    cap: usize,
    entries: RwLock<VecDeque<T>>,
}

impl<T: Clone> BoundedLog<T> {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Insert at the head, trimming the tail past capacity.
    pub(crate) fn push(&self, entry: T) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(self.cap);
    }

    /// Full snapshot, newest first.
    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_past_capacity() {
        let log = BoundedLog::new(3);
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.snapshot(), vec![4, 3, 2]);
    }

    #[test]
    fn snapshot_is_newest_first() {
        let log = BoundedLog::new(10);
        log.push("a");
        log.push("b");
        assert_eq!(log.snapshot(), vec!["b", "a"]);
    }
}
