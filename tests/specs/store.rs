// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store invariants: content addressing, bounded actors, durability.

use crate::support::{clock, open_ledger, seed};
use qntx_core::{Asid, Attestation, AxFilter};
use qntx_store::{StoreConfig, StoreError};

#[test]
fn asid_is_deterministic() {
    let a = Asid::derive("ALICE", "inventory", "fridge", "smartfridge_001");
    let b = Asid::derive("ALICE", "inventory", "fridge", "smartfridge_001");
    assert_eq!(a, b);
}

#[test]
fn create_then_query_by_id_roundtrips() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let store = ledger.attestations();
    let clock = clock();
    let att = seed(&store, &clock, "ALICE", "inventory", "fridge", "smartfridge_001");
    assert_eq!(store.query_by_id(&att.id).unwrap(), att);
}

#[test]
fn bounded_actor_allows_64_then_rejects_the_65th() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let store = ledger.attestations();
    let clock = clock();

    for i in 0..64 {
        seed(&store, &clock, "subject", "observes", &format!("context-{i:02}"), "X");
    }

    let overflow = Attestation::draft("subject", "observes", "context-64", "X")
        .seal(&clock)
        .unwrap();
    match store.create(overflow).unwrap_err() {
        StoreError::BoundedActor { actor, bound, .. } => {
            assert_eq!(actor, "X");
            assert_eq!(bound, 64);
        }
        other => panic!("expected BoundedActor, got {other:?}"),
    }
    assert_eq!(store.len(), 64);
}

#[test]
fn ledger_survives_restart() {
    let clock = clock();
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let ledger = qntx_store::Ledger::open(dir.path(), StoreConfig::default()).unwrap();
        let store = ledger.attestations();
        seed(&store, &clock, "ALICE", "knows", "office", "badge-1").id
    };

    let ledger = qntx_store::Ledger::open(dir.path(), StoreConfig::default()).unwrap();
    let store = ledger.attestations();
    assert!(store.query_by_id(&id).is_ok());
    assert_eq!(store.query(&AxFilter::all(), None, None).len(), 1);
}

#[test]
fn typespace_resolution_is_latest_wins() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let store = ledger.attestations();
    let clock = clock();

    let mut v1 = Attestation::draft("person", "type", "graph", "typespace-v1")
        .attribute("color", "#v1")
        .seal(&clock)
        .unwrap();
    v1.timestamp = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let mut v2 = Attestation::draft("person", "type", "graph", "typespace-v2")
        .attribute("color", "#v2")
        .seal(&clock)
        .unwrap();
    v2.timestamp = chrono::DateTime::from_timestamp(1_710_000_000, 0).unwrap();

    store.create(v2).unwrap();
    store.create(v1).unwrap();
    assert_eq!(store.resolve_type("person").unwrap().color.as_deref(), Some("#v2"));
}
