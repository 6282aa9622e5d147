// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ax parsing, claim expansion, and action dispatch.

use crate::support::{clock, open_ledger, seed};
use qntx_ax::{expand_attestation, parse_ax, tokenize, AxExecutor};
use qntx_core::AxFilter;
use qntx_dispatch::{parse_action, Action};
use qntx_store::StoreConfig;
use tokio_util::sync::CancellationToken;

#[test]
fn parse_filter_then_action() {
    let parsed = parse_ax("ALICE is inventory in fridge so csv out.csv delimiter ;").unwrap();
    assert_eq!(parsed.filter.subjects, vec!["ALICE"]);
    assert_eq!(parsed.filter.predicates, vec!["inventory"]);
    assert_eq!(parsed.filter.contexts, vec!["fridge"]);

    let action = parse_action(parsed.filter, &parsed.action.unwrap()).unwrap();
    let Action::Csv(payload) = action else { panic!("expected csv") };
    assert_eq!(payload.filename, "out.csv");
    assert_eq!(payload.delimiter, ';');
    assert_eq!(payload.filter.subjects, vec!["ALICE"]);
}

#[test]
fn prompt_action_tokens_parse_per_grammar() {
    // prompt Summarize {{subject}} with Be concise model gpt-4o-mini
    let tokens =
        tokenize("prompt Summarize {{subject}} with Be concise model gpt-4o-mini").unwrap();
    let Action::Prompt(payload) = parse_action(AxFilter::all(), &tokens).unwrap() else {
        panic!("expected prompt");
    };
    assert_eq!(payload.template, "Summarize {{subject}}");
    assert_eq!(payload.system_prompt.as_deref(), Some("Be concise"));
    assert_eq!(payload.model.as_deref(), Some("gpt-4o-mini"));
}

#[test]
fn claim_expansion_is_the_cartesian_product() {
    let clock = clock();
    let mut att = qntx_core::Attestation::draft("s1", "p1", "c1", "actor")
        .seal(&clock)
        .unwrap();
    att.subjects.push("s2".into());
    att.contexts.push("c2".into());

    let claims = expand_attestation(&att);
    assert_eq!(claims.len(), 4);
    assert!(claims.iter().all(|c| c.actor == "actor"));
    assert!(claims.iter().all(|c| c.attestation_id == att.id));
}

#[tokio::test]
async fn executor_end_to_end() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let store = ledger.attestations();
    let clock = clock();
    seed(&store, &clock, "ALICE", "inventory", "fridge", "sensor-1");
    seed(&store, &clock, "BOB", "inventory", "cupboard", "sensor-2");

    let executor = AxExecutor::new(store);
    let parsed = parse_ax("ALICE is inventory").unwrap();
    let result = executor.execute_ask(&CancellationToken::new(), &parsed.filter).unwrap();
    assert_eq!(result.attestations.len(), 1);
    assert_eq!(result.attestations[0].subject(), "ALICE");
    assert_eq!(result.stats.scanned, 2);
}
