use crossbeam_channel::{Receiver, Sender};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, trace, warn};

use super::processor::FileProcessor;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;
use crate::results::FileOutcome;

/// Fixed-size set of worker threads pulling paths from a shared queue.
///
/// Each worker processes one file at a time and publishes its outcome. Workers
/// share nothing but the two channels, so a failing file only ever affects its
/// own outcome.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    size: NonZeroUsize,
    metrics: ScanMetrics,
}

impl WorkerPool {
    pub fn new(size: NonZeroUsize) -> Self {
        Self::with_metrics(size, ScanMetrics::new())
    }

    pub fn with_metrics(size: NonZeroUsize, metrics: ScanMetrics) -> Self {
        Self { size, metrics }
    }

    pub fn size(&self) -> usize {
        self.size.get()
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Runs the pool until `paths` is closed and drained.
    ///
    /// Returns once every worker has exited. `outcomes` is consumed, so the
    /// outcome stream closes when this returns.
    pub fn run(
        &self,
        processor: &FileProcessor,
        paths: Receiver<PathBuf>,
        outcomes: Sender<FileOutcome>,
    ) -> ScanResult<()> {
        debug!("Starting {} workers", self.size);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.size.get());
            for worker_id in 0..self.size.get() {
                let paths = paths.clone();
                let outcomes = outcomes.clone();
                let handle = thread::Builder::new()
                    .name(format!("scan-worker-{worker_id}"))
                    .spawn_scoped(scope, move || {
                        self.worker_loop(worker_id, processor, paths, outcomes)
                    })?;
                handles.push(handle);
            }

            // Only the workers' clones may keep the outcome stream open.
            drop(outcomes);

            let mut panicked = 0usize;
            for handle in handles {
                if handle.join().is_err() {
                    panicked += 1;
                }
            }
            if panicked > 0 {
                return Err(ScanError::WorkerPanic(format!(
                    "{panicked} of {} workers panicked",
                    self.size
                )));
            }
            Ok(())
        })
    }

    fn worker_loop(
        &self,
        worker_id: usize,
        processor: &FileProcessor,
        paths: Receiver<PathBuf>,
        outcomes: Sender<FileOutcome>,
    ) {
        let mut handled = 0usize;
        for path in paths.iter() {
            trace!("worker {} processing {}", worker_id, path.display());
            let outcome = processor.process(&path);
            if let Some(err) = &outcome.error {
                warn!("Failed to scan {}: {}", path.display(), err);
            }
            self.metrics.record_outcome(&outcome);
            handled += 1;
            if outcomes.send(outcome).is_err() {
                warn!("Outcome stream closed, worker {} stopping", worker_id);
                break;
            }
        }
        trace!("worker {} finished after {} files", worker_id, handled);
    }
}
