//! Immutable data types for download sessions.
//!
//! Configuration records, progress observations and the success summary.
//! None of these are mutated once a session has started.

pub mod options;
pub mod progress;
pub mod summary;

pub use options::{FetchOptions, ProgressOptions, RetryParameters, Timeouts};
pub use progress::{Progress, ProgressCallback};
pub use summary::TransferSummary;
