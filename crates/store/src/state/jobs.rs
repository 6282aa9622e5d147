// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job event handlers.

use super::MaterializedState;
use crate::event::LedgerEvent;
use qntx_core::{JobOutcome, JobState};

pub(crate) fn apply(state: &mut MaterializedState, event: &LedgerEvent) {
    match event {
        LedgerEvent::JobEnqueued { job } => {
            // Idempotency: skip if the job already exists
            if !state.jobs.contains_key(job.id.as_str()) {
                state.jobs.insert(job.id.to_string(), job.clone());
            }
        }

        LedgerEvent::JobClaimed { job_id, lease_until_ms, started_at, .. } => {
            if let Some(job) = state.jobs.get_mut(job_id.as_str()) {
                // Idempotency: only count the attempt on the state transition
                if job.state == JobState::Queued {
                    job.attempts += 1;
                }
                job.state = JobState::Running;
                job.started_at = Some(*started_at);
                job.lease_until_ms = Some(*lease_until_ms);
                job.backoff_until_ms = None;
            }
        }

        LedgerEvent::JobProgress { job_id, progress, lease_until_ms } => {
            if let Some(job) = state.jobs.get_mut(job_id.as_str()) {
                job.progress = *progress;
                job.lease_until_ms = Some(*lease_until_ms);
            }
        }

        LedgerEvent::JobAnnotated { job_id, result_source, cost_delta_usd } => {
            if let Some(job) = state.jobs.get_mut(job_id.as_str()) {
                if let Some(source) = result_source {
                    job.result_source = Some(source.clone());
                }
                job.cost_usd += cost_delta_usd;
            }
        }

        LedgerEvent::JobCompleted { job_id, outcome, at, error, backoff_until_ms, cursor } => {
            if let Some(job) = state.jobs.get_mut(job_id.as_str()) {
                match outcome {
                    JobOutcome::Success => {
                        job.state = JobState::Done;
                        job.ended_at = Some(*at);
                    }
                    JobOutcome::Failed => {
                        job.state = JobState::Failed;
                        job.ended_at = Some(*at);
                    }
                    JobOutcome::Canceled => {
                        job.state = JobState::Canceled;
                        job.ended_at = Some(*at);
                    }
                    JobOutcome::Retry => {
                        job.state = JobState::Queued;
                        job.backoff_until_ms = *backoff_until_ms;
                    }
                }
                job.error = error.clone();
                job.lease_until_ms = None;

                // Atomic cursor writeback for scheduled jobs
                if let (Some(cursor), Some(schedule_id)) = (cursor, &job.schedule_id) {
                    if let Some(schedule) = state.schedules.get_mut(schedule_id.as_str()) {
                        schedule.cursor = Some(*cursor);
                    }
                }
            }
        }

        LedgerEvent::JobReaped { job_id, .. } => {
            if let Some(job) = state.jobs.get_mut(job_id.as_str()) {
                if job.state == JobState::Running {
                    job.state = JobState::Queued;
                    job.lease_until_ms = None;
                }
            }
        }

        _ => {}
    }
}
