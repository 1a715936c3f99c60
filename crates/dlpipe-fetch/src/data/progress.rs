use std::sync::Arc;
use std::time::Duration;

/// One periodic observation of a running download.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Bytes committed to the destination so far, across all attempts.
    pub bytes_downloaded: u64,

    /// Total length declared by the first response.
    ///
    /// `None` until the first response arrives, and for servers that do not
    /// send `Content-Length`.
    pub total_bytes: Option<u64>,

    /// Throughput over the last reporting interval, in bytes per second.
    pub rate_bps: f64,

    /// Time since the session started.
    pub elapsed: Duration,
}

impl Progress {
    /// Percentage of completion, or `None` while the total is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.bytes_downloaded as f64 / total as f64) * 100.0
            }
        })
    }
}

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;
