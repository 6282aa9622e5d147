// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qntx_core::test_support::fixed_clock;
use qntx_core::Attestation;
use qntx_store::{Ledger, StoreConfig};

fn open_store() -> (tempfile::TempDir, AttestationStore) {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(dir.path(), StoreConfig::default()).unwrap();
    let store = ledger.attestations();
    (dir, store)
}

#[test]
fn stored_handler_wins() {
    let clock = fixed_clock();
    let (_dir, store) = open_store();
    let att = Attestation::draft("wh", "handles", "webhook-ingestion", "self")
        .attribute("code", "parse payload; emit attestations")
        .seal(&clock)
        .unwrap();
    store.create(att).unwrap();

    let dispatch = resolve_ingest(&store, "webhook").unwrap();
    assert_eq!(
        dispatch,
        IngestDispatch::Stored {
            handler_name: "webhook-ingestion".to_string(),
            code: "parse payload; emit attestations".to_string(),
        }
    );
}

#[test]
fn builtin_fallback_for_git() {
    let (_dir, store) = open_store();
    let dispatch = resolve_ingest(&store, "git").unwrap();
    assert_eq!(
        dispatch,
        IngestDispatch::Builtin { handler_name: crate::HANDLER_IX_GIT.to_string() }
    );
}

#[test]
fn unknown_type_carries_script_type_detail() {
    let (_dir, store) = open_store();
    let err = resolve_ingest(&store, "webhook").unwrap_err();
    assert_eq!(err.kind(), qntx_core::ErrorKind::NotRegistered);
    assert!(err
        .details()
        .iter()
        .any(|d| d.key == "script_type" && d.value == "webhook"));
}

#[test]
fn ingest_job_embeds_stored_code() {
    let clock = fixed_clock();
    let (_dir, store) = open_store();
    let att = Attestation::draft("wh", "handles", "webhook-ingestion", "self")
        .attribute("code", "emit items")
        .seal(&clock)
        .unwrap();
    store.create(att).unwrap();

    let input = qntx_ax::tokenize("https://example.test/hook payload.json").unwrap();
    let (handler_name, payload) = ingest_job(&store, "webhook", &input).unwrap();
    assert_eq!(handler_name, "webhook-ingestion");
    assert_eq!(payload["script_type"], "webhook");
    assert_eq!(payload["code"], "emit items");
    assert_eq!(payload["input"][0], "https://example.test/hook");
    assert_eq!(payload["input"][1], "payload.json");
}

#[test]
fn ingest_job_builtin_has_no_code() {
    let (_dir, store) = open_store();
    let input = qntx_ax::tokenize("/repos/qntx").unwrap();
    let (handler_name, payload) = ingest_job(&store, "git", &input).unwrap();
    assert_eq!(handler_name, crate::HANDLER_IX_GIT);
    assert!(payload.get("code").is_none());
    assert_eq!(payload["input"][0], "/repos/qntx");
}

#[test]
fn handler_without_code_falls_through() {
    let clock = fixed_clock();
    let (_dir, store) = open_store();
    let att = Attestation::draft("broken", "handles", "git-ingestion", "self")
        .seal(&clock)
        .unwrap();
    store.create(att).unwrap();

    // Missing code attribute: fall back to the builtin git handler
    let dispatch = resolve_ingest(&store, "git").unwrap();
    assert!(matches!(dispatch, IngestDispatch::Builtin { .. }));
}
