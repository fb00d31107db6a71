use crossbeam_channel::bounded;
use std::thread;
use tracing::{debug, info};

use super::aggregator::aggregate;
use super::criteria::SearchCriteria;
use super::pool::WorkerPool;
use super::processor::FileProcessor;
use super::walker::produce_paths;
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;
use crate::results::ScanReport;

/// Scans the tree under `config.root_path` for matching records.
///
/// The walk, the worker pool and the aggregation run concurrently over two
/// bounded queues. Per-file failures end up on their outcomes; a walk failure
/// or invalid criteria abort the run and no report is produced.
pub fn scan(config: &ScanConfig) -> ScanResult<ScanReport> {
    config.validate()?;
    let criteria = SearchCriteria::new(config.email.as_str(), config.date.as_deref())?;

    info!(
        "Scanning {} for {}{}",
        config.root_path.display(),
        criteria.email(),
        criteria
            .date()
            .map(|d| format!(" on {d}"))
            .unwrap_or_default()
    );

    let processor = FileProcessor::new(criteria, config.encoding_mode);
    let metrics = ScanMetrics::new();
    let pool = WorkerPool::with_metrics(config.pool_size, metrics.clone());

    let capacity = config.queue_capacity.get();
    let (path_tx, path_rx) = bounded(capacity);
    let (outcome_tx, outcome_rx) = bounded(capacity);
    debug!(
        "Using {} workers with queue capacity {}",
        pool.size(),
        capacity
    );

    let (walked, pooled, collected) = thread::scope(|scope| {
        let root = config.root_path.as_path();
        let walk_metrics = &metrics;
        let producer = scope.spawn(move || produce_paths(root, path_tx, walk_metrics));
        let aggregator = scope.spawn(move || aggregate(outcome_rx));

        let pooled = pool.run(&processor, path_rx, outcome_tx);
        (producer.join(), pooled, aggregator.join())
    });

    let walked = walked.map_err(|_| ScanError::WorkerPanic("path producer".to_string()))?;
    let mut report =
        collected.map_err(|_| ScanError::WorkerPanic("result aggregator".to_string()))?;
    walked?;
    pooled?;

    metrics.log_stats();

    if config.sort_by_path {
        report.sort_by_path();
    }

    let totals = report.totals();
    info!(
        "Scan complete. {} of {} files matched, {} records scanned",
        totals.files_matched, totals.files_processed, totals.total_records
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    #[test]
    fn test_scan_small_tree() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("mail.log"),
            "2024-01-01 10:00:00 connect\n\tfrom=<a@x.com>\n2024-01-01 10:01:00 connect\n",
        )
        .unwrap();
        fs::write(dir.path().join("other.log"), "2024-01-01 11:00:00 from=<b@x.com>\n").unwrap();

        let mut config = ScanConfig::new(dir.path(), "a@x.com");
        config.pool_size = NonZeroUsize::new(2).unwrap();
        config.sort_by_path = true;

        let report = scan(&config).unwrap();
        let totals = report.totals();
        assert_eq!(totals.files_processed, 2);
        assert_eq!(totals.files_matched, 1);
        assert_eq!(totals.files_unmatched, 1);
        assert_eq!(totals.total_records, 3);
        assert!(report.outcomes[0].path.ends_with("mail.log"));
    }

    #[test]
    fn test_empty_email_aborts_before_walking() {
        let config = ScanConfig::new("/definitely/not/here", "");
        assert!(matches!(scan(&config), Err(ScanError::InvalidCriteria(_))));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let config = ScanConfig::new(dir.path().join("missing"), "a@x.com");
        assert!(matches!(scan(&config), Err(ScanError::Traversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_finishes_with_fifo_in_tree() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "2024-01-01 10:00:00 from=<a@x.com>\n").unwrap();
        let status = std::process::Command::new("mkfifo")
            .arg(dir.path().join("pipe"))
            .status()
            .unwrap();
        assert!(status.success());

        let report = scan(&ScanConfig::new(dir.path(), "a@x.com")).unwrap();
        assert_eq!(report.totals().files_processed, 1);
        assert_eq!(report.totals().files_matched, 1);
    }
}
