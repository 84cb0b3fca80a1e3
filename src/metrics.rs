use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Thread-safe counters describing sync and search activity.
#[derive(Default)]
pub struct SearchMetrics {
    syncs_completed: AtomicU64,
    documents_indexed: AtomicU64,
    searches_served: AtomicU64,
    last_synced_at: Mutex<Option<String>>,
}

impl SearchMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed sync and the number of documents it wrote.
    pub fn record_sync(&self, documents: u64) {
        self.syncs_completed.fetch_add(1, Ordering::Relaxed);
        self.documents_indexed.store(documents, Ordering::Relaxed);
        let now = OffsetDateTime::now_utc().format(&Rfc3339).ok();
        if let Ok(mut guard) = self.last_synced_at.lock() {
            *guard = now;
        }
    }

    /// Record a search that returned a response.
    pub fn record_search(&self) {
        self.searches_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            syncs_completed: self.syncs_completed.load(Ordering::Relaxed),
            documents_indexed: self.documents_indexed.load(Ordering::Relaxed),
            searches_served: self.searches_served.load(Ordering::Relaxed),
            last_synced_at: self
                .last_synced_at
                .lock()
                .ok()
                .and_then(|guard| guard.clone()),
        }
    }
}

/// Immutable view of counters used for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of completed sheet-to-index syncs since startup.
    pub syncs_completed: u64,
    /// Documents written by the most recent sync.
    pub documents_indexed: u64,
    /// Number of searches answered since startup.
    pub searches_served: u64,
    /// RFC3339 timestamp of the most recent sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_sync_replaces_document_count() {
        let metrics = SearchMetrics::new();
        metrics.record_sync(4);
        metrics.record_sync(2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.syncs_completed, 2);
        assert_eq!(snapshot.documents_indexed, 2);
        assert!(snapshot.last_synced_at.is_some());
    }

    #[test]
    fn counts_searches() {
        let metrics = SearchMetrics::new();
        metrics.record_search();
        metrics.record_search();
        metrics.record_search();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.searches_served, 3);
        assert_eq!(snapshot.syncs_completed, 0);
        assert!(snapshot.last_synced_at.is_none());
    }
}
