use crossbeam_channel::Sender;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;

/// Walks `root` and sends every regular file and symlink to `paths`.
///
/// Hidden files and ignore files are not honoured; every log in the tree is
/// scanned. FIFOs, sockets and device nodes are skipped since opening them
/// can block. The first walk error aborts the walk and is returned. `paths` is
/// dropped on return, which closes the work queue.
pub fn produce_paths(
    root: &Path,
    paths: Sender<PathBuf>,
    metrics: &ScanMetrics,
) -> ScanResult<usize> {
    debug!("Walking {}", root.display());

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut sent = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| ScanError::traversal(root, e.to_string()))?;
        if !entry
            .file_type()
            .is_some_and(|ft| ft.is_file() || ft.is_symlink())
        {
            trace!("Skipping {}", entry.path().display());
            continue;
        }

        trace!("Queueing {}", entry.path().display());
        if paths.send(entry.into_path()).is_err() {
            debug!("Work queue closed, stopping walk");
            break;
        }
        metrics.record_queued();
        sent += 1;
    }

    debug!("Queued {} files from {}", sent, root.display());
    Ok(sent)
}
