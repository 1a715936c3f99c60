//! Pure decisions for a download session.
//!
//! Retry bookkeeping, `Content-Range` validation and the finalization checks.
//! Nothing here touches the network or the destination.

mod finalize;
mod range;
mod retry;

pub use finalize::{FinalizationCheck, HashCheck, run_checks};
pub use range::{
    CONTENT_RANGE, ContentRange, RANGE, RangeError, STATUS_BAD_GATEWAY, STATUS_OK,
    STATUS_PARTIAL_CONTENT, range_header, validate_resume,
};
pub use retry::{Exhausted, PROGRESS_RESET_THRESHOLD, RetryState};
