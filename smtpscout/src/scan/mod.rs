//! The concurrent scan pipeline.
//!
//! ```text
//! walker ──paths──▶ pool (N × processor ▶ record parser) ──outcomes──▶ aggregator
//! ```
//!
//! Both queues are bounded. The walker blocks when workers fall behind, and the
//! aggregator drains outcomes continuously so workers never stall on a full
//! outcome queue.
pub mod aggregator;
pub mod criteria;
pub mod engine;
pub mod pool;
pub mod processor;
pub mod record;
pub mod walker;

pub use aggregator::aggregate;
pub use criteria::SearchCriteria;
pub use engine::scan;
pub use pool::WorkerPool;
pub use processor::FileProcessor;
pub use record::{LogRecord, RecordParser};
pub use walker::produce_paths;
