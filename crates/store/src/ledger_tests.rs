// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qntx_core::test_support::fixed_clock;
use qntx_core::{Attestation, Clock, Job, JobId, JobState, WorkerId};

#[test]
fn reopen_replays_wal() {
    let dir = tempfile::tempdir().unwrap();
    let clock = fixed_clock();
    let attestation = Attestation::draft("s", "p", "c", "a").seal(&clock).unwrap();

    {
        let ledger = Ledger::open(dir.path(), StoreConfig::default()).unwrap();
        ledger.attestations().create(attestation.clone()).unwrap();
    }

    let reopened = Ledger::open(dir.path(), StoreConfig::default()).unwrap();
    assert_eq!(reopened.attestations().query_by_id(&attestation.id).unwrap(), attestation);
}

#[test]
fn crash_leaves_running_job_reapable() {
    let dir = tempfile::tempdir().unwrap();
    let clock = fixed_clock();
    let job_id;
    {
        let ledger = Ledger::open(dir.path(), StoreConfig::default()).unwrap();
        let jobs = ledger.jobs();
        job_id = jobs
            .enqueue(Job::new(JobId::from_string(""), "csv", serde_json::json!({}), &clock))
            .unwrap();
        jobs.claim_next(&WorkerId::from_string("wkr-1"), 1_000, clock.epoch_ms()).unwrap();
        // Simulate a crash: drop without completing
    }

    let reopened = Ledger::open(dir.path(), StoreConfig::default()).unwrap();
    let jobs = reopened.jobs();
    assert_eq!(jobs.get(job_id.as_str()).unwrap().state, JobState::Running);

    // Startup reap returns it to the queue
    let reaped = jobs.reap(clock.epoch_ms() + 2_000).unwrap();
    assert_eq!(reaped, vec![job_id]);
    assert_eq!(jobs.get(job_id.as_str()).unwrap().state, JobState::Queued);
}

#[test]
fn checkpoint_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = fixed_clock();
    let config = StoreConfig::default().snapshot_threshold(3);

    {
        let ledger = Ledger::open(dir.path(), config.clone()).unwrap();
        let store = ledger.attestations();
        for i in 0..5 {
            let att = Attestation::draft(format!("s{i}"), "p", "c", format!("a{i}"))
                .seal(&clock)
                .unwrap();
            store.create(att).unwrap();
        }
    }

    // Snapshot exists and the reopened ledger sees everything
    assert!(dir.path().join("ledger.snapshot").exists());
    let reopened = Ledger::open(dir.path(), config).unwrap();
    assert_eq!(reopened.attestations().len(), 5);
}

#[test]
fn clones_share_state() {
    let dir = tempfile::tempdir().unwrap();
    let clock = fixed_clock();
    let ledger = Ledger::open(dir.path(), StoreConfig::default()).unwrap();
    let a = ledger.attestations();
    let b = ledger.attestations();
    a.create(Attestation::draft("s", "p", "c", "x").seal(&clock).unwrap()).unwrap();
    assert_eq!(b.len(), 1);
}
