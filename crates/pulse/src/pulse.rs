// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler facade.

use crate::config::PulseConfig;
use crate::error::PulseError;
use crate::events::{EventBus, JobEvent};
use crate::sink::StoreSink;
use crate::ticker::Ticker;
use crate::worker::{ActiveJobs, Worker};
use parking_lot::Mutex;
use qntx_core::{Clock, Job, JobId, Schedule, ScheduleId, WorkerId};
use qntx_dispatch::HandlerRegistry;
use qntx_store::{CancelDisposition, JobStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// The Pulse scheduler: a worker pool plus a schedule ticker over the
/// durable job store.
pub struct Pulse<C: Clock + 'static> {
    jobs: JobStore,
    registry: HandlerRegistry,
    config: PulseConfig,
    clock: C,
    bus: EventBus,
    sink: Arc<StoreSink<C>>,
    active: ActiveJobs,
    shutdown: CancellationToken,
    tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl<C: Clock + 'static> Pulse<C> {
    pub fn new(jobs: JobStore, registry: HandlerRegistry, config: PulseConfig, clock: C) -> Self {
        let bus = EventBus::new();
        let sink = Arc::new(StoreSink::new(jobs.clone(), bus.clone(), clock.clone(), config.lease));
        Self {
            jobs,
            registry,
            config,
            clock,
            bus,
            sink,
            active: Arc::new(Mutex::new(HashMap::new())),
            shutdown: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn job_store(&self) -> &JobStore {
        &self.jobs
    }

    /// Spawn the worker pool and ticker. Also reaps leases left over from
    /// a previous process so interrupted work resumes immediately.
    pub fn start(&self) -> Result<(), PulseError> {
        if self.shutdown.is_cancelled() {
            return Err(PulseError::ShutDown);
        }
        let reaped = self.jobs.reap(self.clock.epoch_ms())?;
        if !reaped.is_empty() {
            tracing::info!(count = reaped.len(), "requeued jobs from previous run");
        }

        let mut tasks = self.tasks.lock();
        for _ in 0..self.config.workers.max(1) {
            let worker = Worker {
                id: WorkerId::new(),
                jobs: self.jobs.clone(),
                registry: self.registry.clone(),
                config: self.config.clone(),
                clock: self.clock.clone(),
                bus: self.bus.clone(),
                sink: self.sink.clone(),
                active: self.active.clone(),
                shutdown: self.shutdown.clone(),
            };
            tasks.push(tokio::spawn(worker.run()));
        }
        let ticker = Ticker {
            jobs: self.jobs.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            bus: self.bus.clone(),
            shutdown: self.shutdown.clone(),
        };
        tasks.push(tokio::spawn(ticker.run()));
        tracing::info!(workers = self.config.workers, "pulse started");
        Ok(())
    }

    /// Enqueue a job for `handler_name`. The handler is resolved at
    /// execution time, so enqueueing an unknown name is legal (the job
    /// fails at dispatch).
    pub fn enqueue(
        &self,
        handler_name: &str,
        payload: serde_json::Value,
    ) -> Result<JobId, PulseError> {
        if self.shutdown.is_cancelled() {
            return Err(PulseError::ShutDown);
        }
        let job = Job::new(JobId::new(), handler_name, payload, &self.clock);
        let job_id = self.jobs.enqueue(job)?;
        if let Some(job) = self.jobs.get(job_id.as_str()) {
            self.bus.emit(JobEvent::from_job(&job));
        }
        Ok(job_id)
    }

    /// Cancel a job: queued jobs terminate immediately, running jobs get
    /// their handler context canceled and finish cooperatively.
    pub fn cancel(&self, job_id: &JobId) -> Result<(), PulseError> {
        let disposition = self.jobs.cancel(job_id, self.clock.utc())?;
        match disposition {
            CancelDisposition::Canceled => {
                if let Some(job) = self.jobs.get(job_id.as_str()) {
                    self.bus.emit(JobEvent::from_job(&job));
                }
            }
            CancelDisposition::NeedsCooperative => {
                if let Some(token) = self.active.lock().get(job_id) {
                    token.cancel();
                }
            }
        }
        Ok(())
    }

    pub fn get_job(&self, id: &str) -> Result<Job, PulseError> {
        self.jobs.get(id).ok_or_else(|| PulseError::JobNotFound { id: id.to_string() })
    }

    // =========================================================================
    // schedules
    // =========================================================================

    pub fn create_schedule(&self, schedule: Schedule) -> Result<ScheduleId, PulseError> {
        Ok(self.jobs.create_schedule(schedule)?)
    }

    pub fn update_schedule(&self, schedule: Schedule) -> Result<(), PulseError> {
        Ok(self.jobs.update_schedule(schedule, self.clock.epoch_ms())?)
    }

    pub fn delete_schedule(&self, schedule_id: &ScheduleId) -> Result<(), PulseError> {
        Ok(self.jobs.delete_schedule(schedule_id, self.clock.epoch_ms())?)
    }

    pub fn get_schedule(&self, id: &str) -> Option<Schedule> {
        self.jobs.get_schedule(id)
    }

    pub fn list_schedules(&self) -> Vec<Schedule> {
        self.jobs.list_schedules()
    }

    // =========================================================================
    // observation
    // =========================================================================

    /// Pull-based subscription to job state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.bus.subscribe()
    }

    /// Stop accepting work, cancel worker contexts, wait up to the grace
    /// period for handlers to return, then force a reap.
    pub async fn shutdown(&self) {
        tracing::info!("pulse shutting down");
        self.shutdown.cancel();
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        let drain = async {
            for task in tasks {
                let _ = task.await;
            }
        };
        if tokio::time::timeout(self.config.grace, drain).await.is_err() {
            tracing::warn!(grace_s = self.config.grace.as_secs(), "grace period expired");
        }
        if let Err(e) = self.jobs.reap(self.clock.epoch_ms() + self.config.lease.as_millis() as u64)
        {
            tracing::error!(error = %e, "final reap failed");
        }
    }
}

#[cfg(test)]
#[path = "pulse_tests.rs"]
mod tests;
