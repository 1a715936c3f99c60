use futures_util::StreamExt;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::chain::{TrackedChain, TransformChain};
use super::http::HttpClient;
use super::progress::ProgressReporter;
use super::resume::ResumeDriver;
use super::state::{ByteCounter, ContentLength};
use crate::core::{Exhausted, RetryState, run_checks};
use crate::data::{FetchOptions, TransferSummary};
use crate::error::{FetchError, Result};

/// Downloads resources through an [`HttpClient`], resuming interrupted
/// transfers with range requests.
///
/// The client is reused across attempts and sessions.
#[derive(Debug, Clone)]
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    pub fn client(&self) -> &C { &self.client }

    /// Stream `url` into `sink`, resuming after transient failures until the
    /// whole body is committed, then run the finalization checks.
    ///
    /// Every byte reaches `sink` and the configured hashers exactly once and in
    /// order, however many attempts it takes. Cancelling `cancel` aborts the
    /// in-flight request, the backoff wait and the progress reporter, and the
    /// session fails with [`FetchError::Cancelled`]. The progress reporter is
    /// joined before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Non-retryable failures are returned as soon as they occur. Transient
    /// failures are retried per [`FetchOptions::retry`] and surface as
    /// [`FetchError::RetryLimitExceeded`] once the budget is spent.
    pub async fn download<W>(
        &self,
        url: &str,
        sink: W,
        options: &FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<TransferSummary>
    where
        W: AsyncWrite + Unpin,
    {
        options.validate()?;

        let counter = ByteCounter::default();
        let length = ContentLength::default();
        let reporter = options
            .progress
            .clone()
            .map(|progress| ProgressReporter::spawn(progress, counter.clone(), length.clone(), cancel));

        let result = self.run(url, sink, options, cancel, counter, length).await;

        if let Some(reporter) = reporter {
            reporter.stop().await;
        }
        result
    }

    async fn run<W>(
        &self,
        url: &str,
        sink: W,
        options: &FetchOptions,
        cancel: &CancellationToken,
        counter: ByteCounter,
        length: ContentLength,
    ) -> Result<TransferSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let driver = ResumeDriver::new(&self.client, url, &options.headers, length.clone());
        let mut chain = TrackedChain::new(TransformChain::new(sink, options.taps.clone()), counter);
        let mut retry = RetryState::new(options.retry);

        loop {
            let err = match attempt(&driver, &mut chain, cancel).await {
                Ok(()) => break,
                Err(err) if err.is_retryable() => err,
                Err(err) => return Err(err),
            };

            let position = chain.committed();
            if let Err(e) = driver.check_resumable(position) {
                warn!(url, position, error = %err, "transfer interrupted and cannot be resumed");
                return Err(e.into());
            }

            let wait = match retry.next_wait(position) {
                Ok(wait) => wait,
                Err(Exhausted { retries }) => {
                    return Err(FetchError::RetryLimitExceeded {
                        retries,
                        last: Box::new(err),
                    });
                }
            };

            warn!(
                url,
                position,
                retry = retry.retries(),
                max_retries = options.retry.max_retries,
                wait_ms = wait.as_millis() as u64,
                error = %err,
                "transfer interrupted, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }

        chain.flush().await.map_err(FetchError::Sink)?;

        let summary = TransferSummary {
            bytes_written:  chain.committed(),
            content_length: length.get(),
            retries:        retry.retries(),
        };
        run_checks(&options.checks, &summary)?;

        info!(
            url,
            bytes = summary.bytes_written,
            retries = summary.retries,
            "download complete"
        );
        Ok(summary)
    }
}

/// One request plus the copy of its body into the chain.
///
/// Ends cleanly only when the body is exhausted and, for a known length, every
/// byte of it has been committed.
async fn attempt<C, W>(
    driver: &ResumeDriver<'_, C>,
    chain: &mut TrackedChain<W>,
    cancel: &CancellationToken,
) -> Result<()>
where
    C: HttpClient,
    W: AsyncWrite + Unpin,
{
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        response = driver.open(chain.committed()) => response?,
    };
    let total = driver.content_length();
    let mut body = response.body;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                if let Some(total) = total {
                    let received = chain.committed() + chunk.len() as u64;
                    if received > total {
                        return Err(FetchError::Overrun {
                            expected: total,
                            received,
                        });
                    }
                }
                chain.write(&chunk).await.map_err(FetchError::Sink)?;
            }
            Some(Err(e)) => {
                let err: FetchError = e.into();
                if total == Some(chain.committed()) {
                    debug!(error = %err, "body failed after the last byte, treating as complete");
                    return Ok(());
                }
                return Err(err);
            }
            None => break,
        }
    }

    match total {
        Some(total) if chain.committed() < total => Err(FetchError::Incomplete {
            expected: total,
            received: chain.committed(),
        }),
        _ => Ok(()),
    }
}

/// Download `url` into `sink` with a [`ReqwestClient`](super::ReqwestClient)
/// built from `options.timeouts` and no external cancellation.
#[cfg(feature = "reqwest")]
pub async fn download_url<W>(url: &str, sink: W, options: &FetchOptions) -> Result<TransferSummary>
where
    W: AsyncWrite + Unpin,
{
    let client = super::ReqwestClient::with_timeouts(options.timeouts)?;
    Fetcher::new(client)
        .download(url, sink, options, &CancellationToken::new())
        .await
}
