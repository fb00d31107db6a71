use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::results::FileOutcome;

/// Counters shared by the path producer and the worker pool
#[derive(Debug, Clone, Default)]
pub struct ScanMetrics {
    files_queued: Arc<AtomicU64>,
    files_processed: Arc<AtomicU64>,
    files_failed: Arc<AtomicU64>,
    files_matched: Arc<AtomicU64>,
    records_parsed: Arc<AtomicU64>,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a path handed to the work queue
    pub fn record_queued(&self) {
        self.files_queued.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a finished file
    pub fn record_outcome(&self, outcome: &FileOutcome) {
        let processed = self.files_processed.fetch_add(1, Ordering::Relaxed) + 1;
        self.records_parsed
            .fetch_add(outcome.records as u64, Ordering::Relaxed);
        if outcome.is_error() {
            self.files_failed.fetch_add(1, Ordering::Relaxed);
        } else if outcome.found {
            self.files_matched.fetch_add(1, Ordering::Relaxed);
        }
        debug!(
            "Processed {} files so far ({} queued)",
            processed,
            self.files_queued.load(Ordering::Relaxed)
        );
    }

    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            files_queued: self.files_queued.load(Ordering::Relaxed),
            files_processed: self.files_processed.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            records_parsed: self.records_parsed.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Files queued/processed: {}/{}\n\
             Files matched/failed: {}/{}\n\
             Records parsed: {}",
            stats.files_queued,
            stats.files_processed,
            stats.files_matched,
            stats.files_failed,
            stats.records_parsed
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_queued: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub files_matched: u64,
    pub records_parsed: u64,
}
