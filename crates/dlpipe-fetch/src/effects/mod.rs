//! I/O operations for download sessions.
//!
//! Everything that touches the network, the destination, timers or
//! background tasks lives here. The decisions they act on come from
//! [`crate::core`].

mod chain;
mod fetcher;
mod http;
mod progress;
mod resume;
mod state;

pub use chain::{TrackedChain, TransformChain};
#[cfg(feature = "reqwest")]
pub use fetcher::download_url;
pub use fetcher::Fetcher;
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use http::{BoxStream, HttpClient, HttpResponse};
pub use progress::ProgressReporter;
pub use resume::ResumeDriver;
pub use state::{ByteCounter, ContentLength};
