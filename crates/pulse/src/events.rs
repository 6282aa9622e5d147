// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state change broadcast.

use qntx_core::{Job, JobId, JobState, Progress};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

/// One observable job state change. Delivery is at-least-once; consumers
/// dedupe on `(job_id, state, progress)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    pub job_id: JobId,
    pub state: JobState,
    pub progress: Progress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_source: Option<String>,
    #[serde(default)]
    pub cost_usd: f64,
}

impl JobEvent {
    pub fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id,
            state: job.state,
            progress: job.progress,
            error: job.error.clone(),
            result_source: job.result_source.clone(),
            cost_usd: job.cost_usd,
        }
    }
}

/// Fan-out bus for [`JobEvent`]s. Slow subscribers may observe lag but
/// never block the scheduler.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<JobEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Pull-based subscription; each receiver sees every event emitted
    /// after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: JobEvent) {
        // A send error just means nobody is listening
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
