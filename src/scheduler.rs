//! One-shot delayed job execution on the tokio timer wheel.
//!
//! Jobs are plain values handed to an async callback when the delay elapses.
//! The delay is a lower bound; there is no cancellation and nothing survives
//! process exit.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Schedules one-shot callbacks after a fixed delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayedJobScheduler;

impl DelayedJobScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Run `callback(job)` once, no earlier than `delay` from now.
    ///
    /// Scheduled jobs are independent of each other; each gets its own task.
    pub fn schedule<J, F, Fut>(&self, delay: Duration, job: J, callback: F)
    where
        J: Send + 'static,
        F: FnOnce(J) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        tokio::spawn(async move {
            sleep(delay).await;
            callback(job).await;
        });
    }
}
