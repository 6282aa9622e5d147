// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler tuning knobs.

use std::time::Duration;

/// Configuration for [`crate::Pulse`].
#[derive(Debug, Clone)]
pub struct PulseConfig {
    /// Worker parallelism. Defaults to the host's logical cores.
    pub workers: usize,
    /// Schedule ticker period.
    pub tick_interval: Duration,
    /// How long a worker sleeps between empty claim attempts.
    pub poll_interval: Duration,
    /// Claim lease; heartbeats extend it, expiry triggers a reap.
    pub lease: Duration,
    /// Per-job execution deadline.
    pub job_timeout: Duration,
    /// Per-handler execution deadline. The effective deadline is
    /// `max(job_timeout, handler_timeout)`.
    pub handler_timeout: Duration,
    /// Retry backoff base (doubled per attempt).
    pub retry_base: Duration,
    /// Retry backoff cap.
    pub retry_cap: Duration,
    /// How long shutdown waits for handlers before forcing a reap.
    pub grace: Duration,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            tick_interval: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
            lease: Duration::from_secs(30),
            job_timeout: Duration::from_secs(300),
            handler_timeout: Duration::from_secs(300),
            retry_base: Duration::from_secs(1),
            retry_cap: Duration::from_secs(60),
            grace: Duration::from_secs(30),
        }
    }
}

impl PulseConfig {
    qntx_core::setters! {
        set {
            workers: usize,
            tick_interval: Duration,
            poll_interval: Duration,
            lease: Duration,
            job_timeout: Duration,
            handler_timeout: Duration,
            retry_base: Duration,
            retry_cap: Duration,
            grace: Duration,
        }
    }

    /// Effective handler deadline.
    pub fn deadline(&self) -> Duration {
        self.job_timeout.max(self.handler_timeout)
    }
}
