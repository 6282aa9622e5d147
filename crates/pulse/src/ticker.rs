// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule ticker: a single-threaded loop firing due schedules.

use crate::config::PulseConfig;
use crate::events::{EventBus, JobEvent};
use qntx_core::{Clock, Job, JobId, Schedule};
use qntx_store::{JobStore, StoreError};
use tokio_util::sync::CancellationToken;

pub(crate) struct Ticker<C: Clock> {
    pub(crate) jobs: JobStore,
    pub(crate) config: PulseConfig,
    pub(crate) clock: C,
    pub(crate) bus: EventBus,
    pub(crate) shutdown: CancellationToken,
}

impl<C: Clock + 'static> Ticker<C> {
    /// Tick until shutdown: reap stale leases, then fire due schedules.
    pub(crate) async fn run(self) {
        tracing::debug!("ticker started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.config.tick_interval) => {}
            }
            self.tick();
        }
        tracing::debug!("ticker stopped");
    }

    /// One pass. Public within the crate so tests can drive ticks
    /// directly against a fake clock.
    pub(crate) fn tick(&self) {
        let now_ms = self.clock.epoch_ms();
        match self.jobs.reap(now_ms) {
            Ok(reaped) if !reaped.is_empty() => {
                tracing::warn!(count = reaped.len(), "reaped expired leases");
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "reap failed"),
        }

        let now = self.clock.utc();
        for schedule in self.jobs.due_schedules(now) {
            self.fire(&schedule);
        }
    }

    fn fire(&self, schedule: &Schedule) {
        // One running job per schedule: skip the fire but still advance
        // next_fire_at so the skipped interval is not replayed.
        let running = self
            .jobs
            .jobs_for_schedule(&schedule.id)
            .iter()
            .filter(|j| j.state == qntx_core::JobState::Running)
            .count();
        if running > 0 {
            tracing::debug!(
                schedule_id = %schedule.id,
                running,
                "skip: schedule already has a running job"
            );
            if let Err(e) = self.jobs.mark_fired(&schedule.id, self.clock.utc()) {
                tracing::error!(schedule_id = %schedule.id, error = %e, "mark_fired failed");
            }
            return;
        }

        let mut job = Job::new(
            JobId::new(),
            schedule.handler_name.clone(),
            schedule.instantiate_payload(),
            &self.clock,
        );
        job.schedule_id = Some(schedule.id);

        match self.jobs.enqueue(job) {
            Ok(job_id) => {
                tracing::info!(
                    schedule_id = %schedule.id,
                    job_id = %job_id,
                    handler = %schedule.handler_name,
                    "schedule fired"
                );
                if let Err(e) = self.jobs.mark_fired(&schedule.id, self.clock.utc()) {
                    tracing::error!(schedule_id = %schedule.id, error = %e, "mark_fired failed");
                }
                if let Some(job) = self.jobs.get(job_id.as_str()) {
                    self.bus.emit(JobEvent::from_job(&job));
                }
            }
            Err(StoreError::Busy { depth }) => {
                // Transient: leave next_fire_at alone and retry next tick
                tracing::warn!(schedule_id = %schedule.id, depth, "queue full, deferring fire");
            }
            Err(e) => {
                tracing::error!(schedule_id = %schedule.id, error = %e, "schedule fire failed");
            }
        }
    }
}
