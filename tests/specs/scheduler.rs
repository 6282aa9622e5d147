// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler behavior through the Pulse facade.

use crate::support::{clock, open_ledger};
use async_trait::async_trait;
use qntx_core::{ErrorKind, FakeClock, Job, JobState, Schedule, ScheduleId};
use qntx_dispatch::{Handler, HandlerError, HandlerRegistry, JobContext};
use qntx_pulse::{is_retryable, is_retryable_message, Pulse, PulseConfig};
use qntx_store::StoreConfig;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Counting {
    runs: Arc<AtomicU32>,
}

#[async_trait]
impl Handler for Counting {
    async fn execute(&self, _ctx: &JobContext, _job: &Job) -> Result<(), HandlerError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fast_config() -> PulseConfig {
    PulseConfig::default()
        .workers(2)
        .poll_interval(Duration::from_millis(5))
        .tick_interval(Duration::from_millis(20))
        .grace(Duration::from_secs(2))
}

#[test]
fn retry_classification_matches_the_contract() {
    assert!(is_retryable_message("connection reset by peer"));
    assert!(is_retryable_message("timeout"));
    assert!(!is_retryable_message("unauthorized"));

    assert!(is_retryable(&HandlerError::new(ErrorKind::Backend, "connection reset by peer")));
    assert!(!is_retryable(&HandlerError::new(ErrorKind::Remote, "401 unauthorized")));
    assert!(!is_retryable(&HandlerError::new(ErrorKind::BoundedActor, "actor X over bound")));
}

#[tokio::test]
async fn direct_enqueue_executes_and_terminates() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let runs = Arc::new(AtomicU32::new(0));
    let registry = HandlerRegistry::new();
    registry.register("count", Arc::new(Counting { runs: runs.clone() }));

    let pulse = Pulse::new(ledger.jobs(), registry, fast_config(), clock());
    let mut rx = pulse.subscribe();
    pulse.start().unwrap();

    let job_id = pulse.enqueue("count", serde_json::json!({"n": 1})).unwrap();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("scheduler stalled")
            .unwrap();
        if event.job_id == job_id && event.state == JobState::Done {
            break;
        }
    }
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    pulse.shutdown().await;
}

#[tokio::test]
async fn schedule_ticks_fire_jobs_into_workers() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let runs = Arc::new(AtomicU32::new(0));
    let registry = HandlerRegistry::new();
    registry.register("count", Arc::new(Counting { runs: runs.clone() }));

    // Pulse ticks on real time here, so the schedule interval is short
    let system = qntx_core::SystemClock;
    let pulse = Pulse::new(ledger.jobs(), registry, fast_config(), system.clone());
    pulse.start().unwrap();

    use qntx_core::Clock;
    let schedule = Schedule::new(
        ScheduleId::from_string("sch-spec"),
        "count",
        serde_json::json!({}),
        100,
        system.utc(),
    );
    pulse.create_schedule(schedule).unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;
    pulse.shutdown().await;

    let fired = runs.load(Ordering::SeqCst);
    assert!(fired >= 2, "expected repeated fires, got {fired}");

    let schedule = pulse.get_schedule("sch-spec").unwrap();
    assert!(schedule.last_fire_at.is_some());
}

#[tokio::test]
async fn busy_queue_rejects_enqueue() {
    let (_dir, ledger) = open_ledger(StoreConfig::default().max_queue_depth(1));
    let pulse = Pulse::new(ledger.jobs(), HandlerRegistry::new(), fast_config(), clock());
    pulse.enqueue("x", serde_json::json!({})).unwrap();
    let err = pulse.enqueue("x", serde_json::json!({})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Busy);
}

#[tokio::test]
async fn jobs_survive_process_restart() {
    let clock: FakeClock = clock();
    let dir = tempfile::tempdir().unwrap();
    let job_id = {
        let ledger = qntx_store::Ledger::open(dir.path(), StoreConfig::default()).unwrap();
        let jobs = ledger.jobs();
        let job = Job::new(qntx_core::JobId::from_string(""), "later", serde_json::json!({}), &clock);
        jobs.enqueue(job).unwrap()
    };

    let ledger = qntx_store::Ledger::open(dir.path(), StoreConfig::default()).unwrap();
    let job = ledger.jobs().get(job_id.as_str()).unwrap();
    assert_eq!(job.state, JobState::Queued);
}
