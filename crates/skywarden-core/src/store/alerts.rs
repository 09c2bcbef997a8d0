// ── Bounded alert log ──
//
// Newest-first, capacity-bounded event log. Append, filtered query, and
// clear are each a single short critical section: readers always observe a
// fully inserted or fully evicted log, never a partial state. Id assignment
// lives inside the append lock so ids are strictly monotonic.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::model::{AlertCategory, AlertEvent, AlertFilter, AlertSeverity, MacAddress};

pub struct AlertLog {
    capacity: usize,
    inner: RwLock<LogInner>,
}

struct LogInner {
    /// Newest event at the front.
    events: VecDeque<Arc<AlertEvent>>,
    next_id: u64,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(LogInner {
                events: VecDeque::with_capacity(capacity.min(1024)),
                next_id: 1,
            }),
        }
    }

    /// Record a new event: assign id and timestamp, insert at the head,
    /// evict the tail if the log is over capacity. One exclusive section,
    /// O(1) work, no I/O.
    pub fn append(
        &self,
        category: AlertCategory,
        severity: AlertSeverity,
        title: impl Into<String>,
        body: impl Into<String>,
        device_mac: Option<MacAddress>,
    ) -> Arc<AlertEvent> {
        let mut inner = self.write();

        let event = Arc::new(AlertEvent {
            id: inner.next_id,
            ts: Utc::now(),
            category,
            severity,
            title: title.into(),
            body: body.into(),
            device_mac,
        });
        inner.next_id += 1;

        inner.events.push_front(Arc::clone(&event));
        if inner.events.len() > self.capacity {
            inner.events.pop_back();
        }

        event
    }

    /// Newest `limit` events matching the filter (predicates AND-combined).
    pub fn query(&self, filter: &AlertFilter, limit: usize) -> Vec<Arc<AlertEvent>> {
        self.read()
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Drop every event.
    pub fn clear(&self) {
        self.write().events.clear();
    }

    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().events.is_empty()
    }

    // A poisoned lock only means some writer panicked mid-append; the
    // structure itself is still sound, so recover rather than propagate.
    fn read(&self) -> RwLockReadGuard<'_, LogInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LogInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
