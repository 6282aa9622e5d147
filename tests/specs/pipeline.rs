// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end prompt flow: ax string → action → scheduled job → result
//! attestations.

use crate::support::{clock, open_ledger, seed, CannedChat};
use qntx_ax::{parse_ax, AxExecutor};
use qntx_core::{AxFilter, JobState};
use qntx_dispatch::{parse_action, Action, HandlerRegistry, HANDLER_PROMPT};
use qntx_llm::{ChatClient, ClientConfig, Pricing, UsageTracker};
use qntx_prompt::{PromptPipeline, Template, DEFAULT_RESULT_PREDICATE};
use qntx_pulse::{Pulse, PulseConfig};
use qntx_store::StoreConfig;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn template_renders_the_fridge_example() {
    let clock = clock();
    let att = qntx_core::Attestation::draft("ALICE", "inventory", "fridge", "smartfridge_001")
        .attribute("milk", "240ml")
        .attribute("eggs", "6pc")
        .seal(&clock)
        .unwrap();
    let template = Template::parse("{{subject}}'s {{context}} has {{attributes.milk}}").unwrap();
    assert_eq!(template.execute(&att), "ALICE's fridge has 240ml");
}

#[tokio::test]
async fn ax_action_string_runs_to_result_attestations() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let store = ledger.attestations();
    let clock = clock();
    seed(&store, &clock, "ALICE", "inventory", "fridge", "sensor-1");
    seed(&store, &clock, "BOB", "inventory", "cupboard", "sensor-2");

    // Wire the pipeline behind the registry
    let usage = Arc::new(UsageTracker::in_memory());
    let client =
        ChatClient::with_doer(ClientConfig::default().api_key("sk-spec"), CannedChat::arc());
    let pipeline = PromptPipeline::new(
        AxExecutor::new(store.clone()),
        store.clone(),
        client,
        Pricing::default(),
        usage.clone(),
        clock.clone(),
    );
    let registry = HandlerRegistry::new();
    registry.register(HANDLER_PROMPT, Arc::new(pipeline));

    let config = PulseConfig::default()
        .workers(1)
        .poll_interval(Duration::from_millis(5))
        .grace(Duration::from_secs(2));
    let pulse = Pulse::new(ledger.jobs(), registry, config, clock.clone());
    let mut rx = pulse.subscribe();
    pulse.start().unwrap();

    // The user-level flow: one ax string with a so action
    let parsed = parse_ax(r#"* is inventory so prompt "Summarize {{subject}}" model openai/gpt-4o-mini"#)
        .unwrap();
    let action = parse_action(parsed.filter, &parsed.action.unwrap()).unwrap();
    assert!(matches!(action, Action::Prompt(_)));
    let job_id = pulse.enqueue(action.handler_name(), action.to_payload()).unwrap();

    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("pipeline stalled")
            .unwrap();
        if event.job_id == job_id && event.state == JobState::Done {
            assert_eq!(event.result_source.as_deref(), Some("attestations"));
            assert!(event.cost_usd > 0.0);
            break;
        }
        assert_ne!(event.state, JobState::Failed, "job failed: {:?}", event.error);
    }
    pulse.shutdown().await;

    // One result per source, actors stamped with the model id
    let results = store.query(
        &AxFilter::all().predicates(vec![DEFAULT_RESULT_PREDICATE.into()]),
        None,
        None,
    );
    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.actor(), "openai/gpt-4o-mini");
        let response = result.attribute("response").unwrap().as_str().unwrap();
        assert!(response.starts_with("answer: Summarize"));
    }

    // Usage ledger documents both calls
    let stats = usage.stats(None);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.total_tokens, 3000);
}

#[tokio::test]
async fn csv_action_exports_a_file() {
    let (_dir, ledger) = open_ledger(StoreConfig::default());
    let export_dir = tempfile::tempdir().unwrap();
    let store = ledger.attestations();
    let clock = clock();
    seed(&store, &clock, "ALICE", "inventory", "fridge", "sensor-1");

    let registry = HandlerRegistry::new();
    registry.register(
        qntx_dispatch::HANDLER_CSV,
        Arc::new(qntx_dispatch::CsvHandler::new(
            AxExecutor::new(store.clone()),
            export_dir.path(),
        )),
    );
    let config = PulseConfig::default()
        .workers(1)
        .poll_interval(Duration::from_millis(5))
        .grace(Duration::from_secs(2));
    let pulse = Pulse::new(ledger.jobs(), registry, config, clock.clone());
    let mut rx = pulse.subscribe();
    pulse.start().unwrap();

    let parsed = parse_ax("ALICE so csv report.csv").unwrap();
    let action = parse_action(parsed.filter, &parsed.action.unwrap()).unwrap();
    let job_id = pulse.enqueue(action.handler_name(), action.to_payload()).unwrap();

    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("export stalled")
            .unwrap();
        if event.job_id == job_id && event.state == JobState::Done {
            break;
        }
        assert_ne!(event.state, JobState::Failed, "job failed: {:?}", event.error);
    }
    pulse.shutdown().await;

    let csv = std::fs::read_to_string(export_dir.path().join("report.csv")).unwrap();
    assert!(csv.starts_with("id,subjects,predicates,contexts,actors,timestamp,source"));
    assert!(csv.contains("ALICE"));
}
