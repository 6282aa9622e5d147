// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job sink bound to the durable store.

use crate::events::{EventBus, JobEvent};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use qntx_core::{Clock, JobId, Progress};
use qntx_dispatch::JobSink;
use qntx_store::JobStore;
use std::collections::HashMap;
use std::time::Duration;

/// Routes handler reports into the job store and the event bus.
/// Cursors are staged in memory and written back atomically when the
/// worker completes the job.
pub struct StoreSink<C: Clock> {
    jobs: JobStore,
    bus: EventBus,
    clock: C,
    lease: Duration,
    cursors: Mutex<HashMap<JobId, DateTime<Utc>>>,
}

impl<C: Clock> StoreSink<C> {
    pub fn new(jobs: JobStore, bus: EventBus, clock: C, lease: Duration) -> Self {
        Self { jobs, bus, clock, lease, cursors: Mutex::new(HashMap::new()) }
    }

    /// Remove and return the staged cursor for a job.
    pub fn take_cursor(&self, job_id: &JobId) -> Option<DateTime<Utc>> {
        self.cursors.lock().remove(job_id)
    }
}

impl<C: Clock> JobSink for StoreSink<C> {
    fn progress(&self, job_id: &JobId, progress: Progress) {
        let now_ms = self.clock.epoch_ms();
        if let Err(e) =
            self.jobs.heartbeat(job_id, progress, self.lease.as_millis() as u64, now_ms)
        {
            tracing::warn!(job_id = %job_id, error = %e, "heartbeat failed");
            return;
        }
        if let Some(job) = self.jobs.get(job_id.as_str()) {
            self.bus.emit(JobEvent::from_job(&job));
        }
    }

    fn result_source(&self, job_id: &JobId, source: &str) {
        if let Err(e) =
            self.jobs.annotate(job_id, Some(source.to_string()), 0.0, self.clock.epoch_ms())
        {
            tracing::warn!(job_id = %job_id, error = %e, "result source update failed");
        }
    }

    fn add_cost(&self, job_id: &JobId, cost_usd: f64) {
        if let Err(e) = self.jobs.annotate(job_id, None, cost_usd, self.clock.epoch_ms()) {
            tracing::warn!(job_id = %job_id, error = %e, "cost update failed");
        }
    }

    fn set_cursor(&self, job_id: &JobId, cursor: DateTime<Utc>) {
        self.cursors.lock().insert(*job_id, cursor);
    }
}
