use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::error::FetchError;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// The parts of a GET response the resume protocol looks at.
pub struct HttpResponse<E> {
    pub status:         u16,
    /// Declared `Content-Length`, if the server sent one.
    pub content_length: Option<u64>,
    /// Raw `Content-Range` header, if present.
    pub content_range:  Option<String>,
    pub body:           BoxStream<'static, Result<Bytes, E>>,
}

impl<E> fmt::Debug for HttpResponse<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .field("content_range", &self.content_range)
            .finish_non_exhaustive()
    }
}

/// Asynchronous HTTP transport.
///
/// Implementations own redirects, connection pooling and timeouts. They report
/// the response status as-is; interpreting it is the caller's job. Errors are
/// converted into [`FetchError`], which decides whether they are retried.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - Scripted clients in tests
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Into<FetchError> + Send + 'static;

    /// Send a GET request with the given headers and return the response
    /// once its headers have arrived.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use futures_util::StreamExt;
    use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, HeaderMap};

    use super::*;
    use crate::data::Timeouts;
    use crate::error::Result;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client:   reqwest::Client,
        timeouts: Timeouts,
    }

    impl ReqwestClient {
        /// Create a client with the default timeouts.
        pub fn new() -> Result<Self> { Self::with_timeouts(Timeouts::default()) }

        pub fn with_timeouts(timeouts: Timeouts) -> Result<Self> {
            let client = reqwest::Client::builder()
                .pool_idle_timeout(timeouts.idle)
                .build()?;
            Ok(Self { client, timeouts })
        }

        /// Wrap an existing client. `response_header` still bounds the wait
        /// for response headers.
        pub fn from_client(client: reqwest::Client, timeouts: Timeouts) -> Self {
            Self { client, timeouts }
        }
    }

    fn header_str<'a>(headers: &'a HeaderMap, name: &reqwest::header::HeaderName) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    impl HttpClient for ReqwestClient {
        type Error = FetchError;

        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<HttpResponse<FetchError>> {
            let mut request = self.client.get(url);
            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }

            let response = tokio::time::timeout(self.timeouts.response_header, request.send())
                .await
                .map_err(|_| FetchError::Timeout)??;

            let content_length =
                header_str(response.headers(), &CONTENT_LENGTH).and_then(|v| v.trim().parse().ok());
            let content_range = header_str(response.headers(), &CONTENT_RANGE).map(str::to_owned);

            Ok(HttpResponse {
                status: response.status().as_u16(),
                content_length,
                content_range,
                body: Box::pin(response.bytes_stream().map(|chunk| chunk.map_err(FetchError::from))),
            })
        }
    }

    impl From<reqwest::Error> for FetchError {
        fn from(e: reqwest::Error) -> Self {
            if e.is_builder() {
                FetchError::InvalidRequest(e.to_string())
            } else if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
