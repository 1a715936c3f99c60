use std::time::Duration;

use crate::data::RetryParameters;

/// Forward progress since the previous failure that earns a fresh backoff.
pub const PROGRESS_RESET_THRESHOLD: u64 = 1 << 20;

/// The retry budget has been spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted {
    pub retries: u32,
}

/// Per-session retry bookkeeping.
///
/// Only decides; the caller performs the actual wait.
#[derive(Debug, Clone)]
pub struct RetryState {
    params:        RetryParameters,
    retries:       u32,
    current_wait:  Option<Duration>,
    last_position: Option<u64>,
}

impl RetryState {
    pub fn new(params: RetryParameters) -> Self {
        Self {
            params,
            retries: 0,
            current_wait: None,
            last_position: None,
        }
    }

    /// Retries granted so far.
    pub fn retries(&self) -> u32 { self.retries }

    pub fn is_exhausted(&self) -> bool { self.retries >= self.params.max_retries }

    /// Grant one more retry after a failure at `position` committed bytes and
    /// return how long to wait before it.
    ///
    /// The wait resets to the base on the first failure and whenever the
    /// position advanced by more than [`PROGRESS_RESET_THRESHOLD`] since the
    /// previous failure. The retry counter is never reset.
    pub fn next_wait(&mut self, position: u64) -> Result<Duration, Exhausted> {
        if self.is_exhausted() {
            return Err(Exhausted {
                retries: self.retries,
            });
        }

        let wait = match (self.current_wait, self.last_position) {
            (Some(current), Some(previous))
                if position <= previous.saturating_add(PROGRESS_RESET_THRESHOLD) =>
            {
                current
            }
            _ => self.params.base_wait,
        };

        self.last_position = Some(position);
        self.retries += 1;
        self.current_wait = Some(wait.saturating_mul(self.params.wait_multiplier));

        Ok(wait)
    }
}
