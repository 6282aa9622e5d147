// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qntx_core::JobState;

fn event(state: JobState) -> JobEvent {
    JobEvent {
        job_id: JobId::from_string("job-1"),
        state,
        progress: Progress::new(0, 0),
        error: None,
        result_source: None,
        cost_usd: 0.0,
    }
}

#[tokio::test]
async fn subscribers_see_events_after_subscribing() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    bus.emit(event(JobState::Queued));
    bus.emit(event(JobState::Running));

    assert_eq!(rx.recv().await.unwrap().state, JobState::Queued);
    assert_eq!(rx.recv().await.unwrap().state, JobState::Running);
}

#[test]
fn emit_without_subscribers_is_fine() {
    let bus = EventBus::new();
    bus.emit(event(JobState::Queued));
}

#[test]
fn from_job_copies_fields() {
    let mut job = Job::builder().build();
    job.error = Some("boom".into());
    job.result_source = Some("out.csv".into());
    job.cost_usd = 0.25;
    let event = JobEvent::from_job(&job);
    assert_eq!(event.job_id, job.id);
    assert_eq!(event.error.as_deref(), Some("boom"));
    assert_eq!(event.result_source.as_deref(), Some("out.csv"));
    assert_eq!(event.cost_usd, 0.25);
}
