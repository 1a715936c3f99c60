use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dlpipe_fetch::{FetchOptions, Fetcher, ReqwestClient, RetryParameters};
use dlpipe_verify::ExpectedHash;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::parse::Header;
use super::progress;

#[derive(Clone, Debug, Parser)]
#[command(name = "dl-pipe", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// Request header, e.g. "Authorization: Bearer ..."; may be repeated
    #[arg(long = "header", short = 'H', value_name = "NAME: VALUE")]
    pub headers: Vec<Header>,

    /// Expected digest of the content, e.g. "sha256:<hex>"
    #[arg(long, value_name = "ALGO:HEX")]
    pub hash: Option<ExpectedHash>,

    /// Report progress on stderr every 10 seconds
    #[arg(long)]
    pub progress: bool,

    /// Retries allowed after transient failures
    #[arg(long, default_value_t = RetryParameters::default().max_retries)]
    pub max_retries: u32,

    /// Wait before the first retry, in milliseconds
    #[arg(long, default_value_t = RetryParameters::default().base_wait.as_millis() as u64)]
    pub retry_wait_ms: u64,

    pub url: String,
}

impl App {
    pub fn options(&self) -> FetchOptions {
        let retry = RetryParameters {
            max_retries: self.max_retries,
            base_wait: Duration::from_millis(self.retry_wait_ms),
            ..RetryParameters::default()
        };
        let mut options = FetchOptions::default()
            .headers(self.headers.iter().cloned().map(Header::into_pair).collect())
            .retry(retry);

        if let Some(expected) = &self.hash {
            options = options.expected_hash(expected.clone());
        }
        if self.progress {
            options = options.on_progress(progress::report, progress::INTERVAL);
        }
        options
    }

    pub async fn run(self) -> Result<()> {
        let options = self.options();
        let client =
            ReqwestClient::with_timeouts(options.timeouts).context("failed to build HTTP client")?;

        let cancel = CancellationToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let mut stdout = tokio::io::stdout();
        let result = Fetcher::new(client)
            .download(&self.url, &mut stdout, &options, &cancel)
            .await;
        ctrl_c.abort();

        let summary = result.with_context(|| format!("failed to download {}", self.url))?;
        debug!(
            bytes = summary.bytes_written,
            retries = summary.retries,
            "finished"
        );
        Ok(())
    }
}
