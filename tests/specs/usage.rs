// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cost and usage accounting specs.

use qntx_core::test_support::ts;
use qntx_core::UsageRecord;
use qntx_llm::{Pricing, UsageTracker};

#[test]
fn cost_of_gpt_4o_mini_is_exact() {
    let pricing = Pricing::default();
    let cost = pricing.cost("openai/gpt-4o-mini", 1000, 500);
    assert!((cost - 0.00045).abs() < 1e-7);
}

#[test]
fn unknown_model_costs_the_flat_fallback() {
    let pricing = Pricing::default();
    assert_eq!(pricing.cost("vendor/unknown", 1000, 500), 0.01);
}

#[test]
fn stats_over_mixed_outcomes() {
    let tracker = UsageTracker::in_memory();
    let models = ["m/a", "m/a", "m/a", "m/a", "m/b", "m/b", "m/b", "m/c", "m/c", "m/c"];
    for (i, model) in models.iter().enumerate() {
        tracker
            .track(
                UsageRecord::builder()
                    .model_name(*model)
                    .success(i < 8)
                    .tokens_used(150u64)
                    .cost(0.05)
                    .request_ts(ts("2024-06-15T10:00:00Z"))
                    .build(),
            )
            .unwrap();
    }

    let stats = tracker.stats(None);
    assert_eq!(stats.total, 10);
    assert_eq!(stats.successful, 8);
    assert!((stats.success_rate - 0.8).abs() < 1e-9);
    assert_eq!(stats.total_tokens, 1500);
    assert!((stats.total_cost - 0.50).abs() < 1e-9);
    assert_eq!(stats.unique_models, 3);
}

#[test]
fn breakdown_orders_by_spend() {
    let tracker = UsageTracker::in_memory();
    for (model, cost) in [("m/cheap", 0.01), ("m/pricey", 0.80), ("m/mid", 0.20)] {
        tracker
            .track(
                UsageRecord::builder()
                    .model_name(model)
                    .cost(cost)
                    .request_ts(ts("2024-06-15T10:00:00Z"))
                    .build(),
            )
            .unwrap();
    }
    let rows = tracker.breakdown(None);
    let names: Vec<&str> = rows.iter().map(|r| r.model_name.as_str()).collect();
    assert_eq!(names, vec!["m/pricey", "m/mid", "m/cheap"]);
}
