/// Outcome of a download that committed the whole body and passed every
/// finalization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    /// Bytes written to the destination.
    pub bytes_written:  u64,
    /// Length declared by the first response, if any.
    pub content_length: Option<u64>,
    /// Retries consumed by transient failures.
    pub retries:        u32,
}
