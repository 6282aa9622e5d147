// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{Ledger, StoreConfig};
use qntx_core::test_support::{fixed_clock, ts};
use qntx_core::{Attestation, Clock};

fn open_store(config: StoreConfig) -> (tempfile::TempDir, AttestationStore) {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(dir.path(), config).unwrap();
    let store = ledger.attestations();
    (dir, store)
}

fn att(subject: &str, context: &str, actor: &str, clock: &impl Clock) -> Attestation {
    Attestation::draft(subject, "observes", context, actor)
        .source("test")
        .seal(clock)
        .unwrap()
}

// =============================================================================
// create
// =============================================================================

#[test]
fn create_then_query_by_id_is_equal() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    let attestation = att("s", "c", "a", &clock);
    let id = store.create(attestation.clone()).unwrap();
    assert_eq!(store.query_by_id(&id).unwrap(), attestation);
}

#[test]
fn byte_equal_reinsert_is_idempotent() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    let attestation = att("s", "c", "a", &clock);
    store.create(attestation.clone()).unwrap();
    let id = store.create(attestation).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.query_by_id(&id).unwrap().source, "test");
}

#[test]
fn differing_content_same_id_is_duplicate() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    store.create(att("s", "c", "a", &clock)).unwrap();
    let conflicting = Attestation::draft("s", "observes", "c", "a")
        .source("elsewhere")
        .seal(&clock)
        .unwrap();
    let err = store.create(conflicting).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { .. }));
}

#[test]
fn query_by_id_missing_is_not_found() {
    let (_dir, store) = open_store(StoreConfig::default());
    let err = store.query_by_id(&qntx_core::Asid::derive("x", "y", "z", "w")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

// =============================================================================
// bounded actor
// =============================================================================

#[test]
fn bounded_actor_enforced_at_bound() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default().actor_context_bound(3));
    for i in 0..3 {
        store.create(att("s", &format!("ctx-{i}"), "X", &clock)).unwrap();
    }
    let err = store.create(att("s", "ctx-overflow", "X", &clock)).unwrap_err();
    match err {
        StoreError::BoundedActor { actor, contexts, bound } => {
            assert_eq!(actor, "X");
            assert_eq!(contexts, vec!["ctx-overflow"]);
            assert_eq!(bound, 3);
        }
        other => panic!("expected BoundedActor, got {other:?}"),
    }
}

#[test]
fn repeated_context_does_not_consume_bound() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default().actor_context_bound(2));
    store.create(att("s1", "same", "X", &clock)).unwrap();
    store.create(att("s2", "same", "X", &clock)).unwrap();
    store.create(att("s3", "same", "X", &clock)).unwrap();
    assert_eq!(store.len(), 3);
}

#[test]
fn rejected_write_leaves_no_trace() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default().actor_context_bound(1));
    store.create(att("s", "one", "X", &clock)).unwrap();
    let _ = store.create(att("s", "two", "X", &clock)).unwrap_err();
    assert_eq!(store.len(), 1);
    // The failed write must not have registered the new context
    store.create(att("other", "one", "X", &clock)).unwrap();
}

// =============================================================================
// query ordering
// =============================================================================

#[test]
fn query_orders_timestamp_desc_id_asc() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());

    let mut early = att("early", "c", "a1", &clock);
    early.timestamp = ts("2024-06-01T00:00:00Z");
    let mut late_one = att("late1", "c", "a2", &clock);
    late_one.timestamp = ts("2024-06-02T00:00:00Z");
    let mut late_two = att("late2", "c", "a3", &clock);
    late_two.timestamp = ts("2024-06-02T00:00:00Z");

    for a in [&early, &late_one, &late_two] {
        store.create(a.clone()).unwrap();
    }

    let results = store.query(&qntx_core::AxFilter::all(), None, None);
    assert_eq!(results.len(), 3);
    assert_eq!(results[2].subject(), "early");
    // Equal timestamps tie-break on ascending id
    let (a, b) = (&results[0], &results[1]);
    assert_eq!(a.timestamp, b.timestamp);
    assert!(a.id < b.id);
}

#[test]
fn query_applies_filter_limit_and_since() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    for i in 0..5 {
        let mut a = att(&format!("s{i}"), "c", &format!("actor-{i}"), &clock);
        a.timestamp = ts(&format!("2024-06-0{}T00:00:00Z", i + 1));
        store.create(a).unwrap();
    }

    let filter = qntx_core::AxFilter::all();
    // since is a strict lower bound
    let results = store.query(&filter, None, Some(ts("2024-06-03T00:00:00Z")));
    assert_eq!(results.len(), 2);

    let limited = store.query(&filter, Some(2), None);
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].subject(), "s4");
}

#[test]
fn query_respects_dimension_filter() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    store.create(att("wanted", "c", "a1", &clock)).unwrap();
    store.create(att("other", "c", "a2", &clock)).unwrap();

    let filter = qntx_core::AxFilter::all().subjects(vec!["wanted".into()]);
    let results = store.query(&filter, None, None);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].subject(), "wanted");
}

#[test]
fn single_predicate_context_filter_uses_the_index() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    store.create(att("s1", "fridge", "a1", &clock)).unwrap();
    let mut multi = Attestation::draft("s2", "observes", "fridge", "a2")
        .also_context("cupboard")
        .seal(&clock)
        .unwrap();
    multi.source = "test".into();
    store.create(multi).unwrap();
    store.create(att("s3", "cupboard", "a3", &clock)).unwrap();

    let filter = qntx_core::AxFilter::all()
        .predicates(vec!["observes".into()])
        .contexts(vec!["fridge".into()]);
    let results = store.query(&filter, None, None);
    let subjects: Vec<&str> = results.iter().map(|a| a.subject()).collect();
    assert_eq!(subjects.len(), 2);
    assert!(subjects.contains(&"s1"));
    assert!(subjects.contains(&"s2"));
}

// =============================================================================
// stream
// =============================================================================

#[test]
fn stream_is_ascending_and_strictly_after_watermark() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    for i in 1..=3 {
        let mut a = att(&format!("s{i}"), "c", &format!("a{i}"), &clock);
        a.timestamp = ts(&format!("2024-06-0{i}T00:00:00Z"));
        store.create(a).unwrap();
    }

    let all = store.stream(None);
    assert_eq!(all.len(), 3);
    assert!(all[0].timestamp < all[1].timestamp);

    let after = store.stream(Some(ts("2024-06-01T00:00:00Z")));
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].subject(), "s2");

    // Restartable from the last seen timestamp
    let resumed = store.stream(Some(after[1].timestamp));
    assert!(resumed.is_empty());
}

// =============================================================================
// typespace
// =============================================================================

#[test]
fn resolve_type_returns_latest_definition() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());

    let mut old = Attestation::draft("person", "type", "graph", "typespace-v1")
        .attribute("color", "#111111")
        .seal(&clock)
        .unwrap();
    old.timestamp = ts("2024-01-01T00:00:00Z");
    let mut new = Attestation::draft("person", "type", "graph", "typespace-v2")
        .attribute("color", "#222222")
        .seal(&clock)
        .unwrap();
    new.timestamp = ts("2024-06-01T00:00:00Z");

    // Insertion order must not matter
    store.create(new).unwrap();
    store.create(old).unwrap();

    let def = store.resolve_type("person").unwrap();
    assert_eq!(def.color.as_deref(), Some("#222222"));
    assert!(store.resolve_type("unknown").is_none());
}

#[test]
fn resolve_relationship_type() {
    let clock = fixed_clock();
    let (_dir, store) = open_store(StoreConfig::default());
    let att = Attestation::draft("reports_to", "relationship_type", "graph", "typespace")
        .attribute("link_distance", 80.0)
        .seal(&clock)
        .unwrap();
    store.create(att).unwrap();
    let def = store.resolve_relationship_type("reports_to").unwrap();
    assert_eq!(def.link_distance, Some(80.0));
}
