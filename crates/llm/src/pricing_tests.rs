// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn known_model_exact_cost() {
    let pricing = Pricing::default();
    // 1000 prompt at 0.15/M + 500 completion at 0.60/M
    let cost = pricing.cost("openai/gpt-4o-mini", 1000, 500);
    assert!((cost - 0.00045).abs() < 1e-7, "cost was {cost}");
}

#[test]
fn unknown_model_flat_fallback() {
    let pricing = Pricing::default();
    assert_eq!(pricing.cost("vendor/unknown", 1000, 500), FALLBACK_COST_USD);
    assert_eq!(pricing.cost("vendor/unknown", 0, 0), FALLBACK_COST_USD);
}

#[test]
fn zero_tokens_cost_nothing() {
    let pricing = Pricing::default();
    for (model, _, _) in [("openai/gpt-4o-mini", 0, 0), ("anthropic/claude-3.5-sonnet", 0, 0)] {
        assert_eq!(pricing.cost(model, 0, 0), 0.0);
    }
}

#[test]
fn cost_is_linear_in_each_token_count() {
    let pricing = Pricing::default();
    let model = "anthropic/claude-3.5-sonnet";
    let base = pricing.cost(model, 1_000, 1_000);
    assert!((pricing.cost(model, 2_000, 1_000) - base - pricing.cost(model, 1_000, 0)).abs() < 1e-9);
    assert!((pricing.cost(model, 1_000, 2_000) - base - pricing.cost(model, 0, 1_000)).abs() < 1e-9);
}

#[test]
fn with_model_overrides() {
    let pricing = Pricing::default().with_model("local/test", 1.0, 2.0);
    let cost = pricing.cost("local/test", 1_000_000, 1_000_000);
    assert!((cost - 3.0).abs() < 1e-9);
}

#[test]
fn price_lookup() {
    let pricing = Pricing::default();
    let price = pricing.price("openai/gpt-4o-mini").unwrap();
    assert_eq!(price.prompt_per_million, 0.15);
    assert_eq!(price.completion_per_million, 0.60);
    assert!(pricing.price("vendor/unknown").is_none());
}
