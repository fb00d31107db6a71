pub mod config;
pub mod errors;
pub mod metrics;
pub mod report;
pub mod results;
pub mod scan;

pub use config::ScanConfig;
pub use errors::{ScanError, ScanResult};
pub use results::{FileOutcome, ScanReport, ScanTotals};
pub use scan::scan;
