// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::MaterializedState;
use crate::event::LedgerEvent;
use qntx_core::test_support::{simple_attestation, ts};
use qntx_core::{Job, JobId, JobOutcome, JobState, Progress, WorkerId};

fn enqueued(id: &str) -> LedgerEvent {
    let job = Job::builder().build();
    let mut job = job;
    job.id = JobId::from_string(id);
    LedgerEvent::JobEnqueued { job }
}

fn claimed(id: &str) -> LedgerEvent {
    LedgerEvent::JobClaimed {
        job_id: JobId::from_string(id),
        worker_id: WorkerId::from_string("wkr-1"),
        lease_until_ms: 10_000,
        started_at: ts("2024-06-15T10:00:00Z"),
    }
}

// =============================================================================
// idempotency
// =============================================================================

#[test]
fn attestation_created_twice_is_single_insert() {
    let mut state = MaterializedState::default();
    let event = LedgerEvent::AttestationCreated {
        attestation: simple_attestation("s", "p", "c", "a"),
    };
    state.apply_event(&event);
    state.apply_event(&event);
    assert_eq!(state.attestations.len(), 1);
    assert_eq!(state.by_time.len(), 1);
    assert_eq!(state.contexts_for_actor("a"), 1);
}

#[test]
fn claim_applied_twice_counts_one_attempt() {
    let mut state = MaterializedState::default();
    state.apply_event(&enqueued("job-1"));
    state.apply_event(&claimed("job-1"));
    state.apply_event(&claimed("job-1"));
    let job = state.get_job("job-1").unwrap();
    assert_eq!(job.attempts, 1);
    assert_eq!(job.state, JobState::Running);
}

// =============================================================================
// job lifecycle
// =============================================================================

#[test]
fn retry_outcome_requeues_with_backoff() {
    let mut state = MaterializedState::default();
    state.apply_event(&enqueued("job-1"));
    state.apply_event(&claimed("job-1"));
    state.apply_event(&LedgerEvent::JobCompleted {
        job_id: JobId::from_string("job-1"),
        outcome: JobOutcome::Retry,
        at: ts("2024-06-15T10:01:00Z"),
        error: Some("connection reset".into()),
        backoff_until_ms: Some(12_000),
        cursor: None,
    });
    let job = state.get_job("job-1").unwrap();
    assert_eq!(job.state, JobState::Queued);
    assert_eq!(job.backoff_until_ms, Some(12_000));
    assert_eq!(job.error.as_deref(), Some("connection reset"));
    assert!(job.ended_at.is_none());
    assert!(job.lease_until_ms.is_none());
}

#[test]
fn progress_event_updates_job() {
    let mut state = MaterializedState::default();
    state.apply_event(&enqueued("job-1"));
    state.apply_event(&claimed("job-1"));
    state.apply_event(&LedgerEvent::JobProgress {
        job_id: JobId::from_string("job-1"),
        progress: Progress::new(5, 9),
        lease_until_ms: 99_000,
    });
    let job = state.get_job("job-1").unwrap();
    assert_eq!(job.progress, Progress::new(5, 9));
    assert_eq!(job.lease_until_ms, Some(99_000));
}

#[test]
fn reap_only_affects_running_jobs() {
    let mut state = MaterializedState::default();
    state.apply_event(&enqueued("job-1"));
    state.apply_event(&LedgerEvent::JobReaped {
        job_id: JobId::from_string("job-1"),
        at_ms: 1,
    });
    assert_eq!(state.get_job("job-1").unwrap().state, JobState::Queued);

    state.apply_event(&claimed("job-1"));
    state.apply_event(&LedgerEvent::JobReaped {
        job_id: JobId::from_string("job-1"),
        at_ms: 2,
    });
    let job = state.get_job("job-1").unwrap();
    assert_eq!(job.state, JobState::Queued);
    assert!(job.lease_until_ms.is_none());
}

// =============================================================================
// prefix lookup
// =============================================================================

#[test]
fn get_job_by_unique_prefix() {
    let mut state = MaterializedState::default();
    state.apply_event(&enqueued("job-abc123"));
    state.apply_event(&enqueued("job-xyz789"));
    assert!(state.get_job("job-abc").is_some());
    assert!(state.get_job("job-a").is_some());
    // Ambiguous prefix resolves to none
    assert!(state.get_job("job-").is_none());
    assert!(state.get_job("job-nope").is_none());
}
