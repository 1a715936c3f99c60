//! Resumable HTTP downloads with streaming verification.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`](crate::core) - Pure decisions: retry backoff, range validation, finalization
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Resumable**: interrupted transfers continue with `Range` requests from the
//!   last committed byte, and the server's `Content-Range` must match exactly
//! - **Single-Pass**: hashers are fed from the same writes as the destination and
//!   keep their state across attempts, so the digest covers the whole resource
//! - **Bounded Retries**: exponential backoff that resets after real progress
//! - **Cancellable**: one `CancellationToken` stops requests, waits and progress
//!
//! # Example
//!
//! ```no_run
//! use dlpipe_fetch::{FetchOptions, Fetcher, ReqwestClient};
//! use dlpipe_verify::ExpectedHash;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let expected: ExpectedHash =
//!     "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".parse()?;
//! let options = FetchOptions::default().expected_hash(expected);
//!
//! let fetcher = Fetcher::new(ReqwestClient::new()?);
//! let summary = fetcher
//!     .download("https://example.com/file", tokio::io::stdout(), &options, &CancellationToken::new())
//!     .await?;
//! eprintln!("{} bytes after {} retries", summary.bytes_written, summary.retries);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{ContentRange, FinalizationCheck, HashCheck, RangeError, RetryState};
pub use data::{
    FetchOptions, Progress, ProgressCallback, ProgressOptions, RetryParameters, Timeouts,
    TransferSummary,
};
#[cfg(feature = "reqwest")]
pub use effects::{ReqwestClient, download_url};
pub use effects::{
    BoxStream, ByteCounter, ContentLength, Fetcher, HttpClient, HttpResponse, TrackedChain,
    TransformChain,
};
pub use error::{FetchError, Result};
