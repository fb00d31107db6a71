use crossbeam_channel::Receiver;
use tracing::debug;

use crate::results::{FileOutcome, ScanReport};

/// Drains `outcomes` until every sender is gone.
///
/// Outcomes are kept in arrival order, error outcomes included.
pub fn aggregate(outcomes: Receiver<FileOutcome>) -> ScanReport {
    let report: ScanReport = outcomes.iter().collect();
    debug!("Collected {} outcomes", report.outcomes.len());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use crossbeam_channel::bounded;
    use std::thread;

    #[test]
    fn test_collects_until_all_senders_close() {
        let (tx, rx) = bounded(1);
        let second = tx.clone();

        let collector = thread::spawn(move || aggregate(rx));
        tx.send(FileOutcome::new("a.log")).unwrap();
        second
            .send(FileOutcome::failed("b.log", ScanError::file_not_found("b.log")))
            .unwrap();
        drop(tx);
        second.send(FileOutcome::new("c.log")).unwrap();
        drop(second);

        let report = collector.join().unwrap();
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.totals().files_errored, 1);
    }
}
