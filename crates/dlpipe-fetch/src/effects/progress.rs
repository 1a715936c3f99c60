//! Periodic progress observation bound to a session's cancellation scope.

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::state::{ByteCounter, ContentLength};
use crate::data::{Progress, ProgressOptions};

/// Background task invoking the progress callback every interval.
///
/// The task only reads the shared counter and length. It stops when the
/// parent token is cancelled, when [`stop`](Self::stop) is awaited, or when
/// the reporter is dropped. After `stop` returns the callback is never
/// invoked again.
#[derive(Debug)]
pub struct ProgressReporter {
    token:  CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    pub fn spawn(
        options: ProgressOptions,
        counter: ByteCounter,
        length: ContentLength,
        parent: &CancellationToken,
    ) -> Self {
        let token = parent.child_token();
        let baseline = counter.get();
        let handle = tokio::spawn(tick(options, counter, baseline, length, token.clone()));
        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Stop ticking and wait for the task to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "progress reporter terminated abnormally");
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) { self.token.cancel(); }
}

async fn tick(
    options: ProgressOptions,
    counter: ByteCounter,
    baseline: u64,
    length: ContentLength,
    token: CancellationToken,
) {
    let started = Instant::now();
    let mut ticker = time::interval_at(started + options.interval, options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last = baseline;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let current = counter.get();
                let progress = Progress {
                    bytes_downloaded: current,
                    total_bytes:      length.get(),
                    rate_bps:         current.saturating_sub(last) as f64
                        / options.interval.as_secs_f64(),
                    elapsed:          started.elapsed(),
                };
                last = current;
                (options.callback)(&progress);
            }
        }
    }
}
