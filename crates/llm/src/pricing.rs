// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static per-model pricing.

use std::collections::HashMap;

/// USD per million tokens, prompt and completion respectively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    pub prompt_per_million: f64,
    pub completion_per_million: f64,
}

/// Flat cost charged when the model is not in the table.
pub const FALLBACK_COST_USD: f64 = 0.01;

/// Per-million prices for the models the platform routinely routes to.
const PRICE_TABLE: &[(&str, f64, f64)] = &[
    ("openai/gpt-4o-mini", 0.15, 0.60),
    ("openai/gpt-4o", 2.50, 10.00),
    ("openai/o3-mini", 1.10, 4.40),
    ("anthropic/claude-3.5-sonnet", 3.00, 15.00),
    ("anthropic/claude-3.5-haiku", 0.80, 4.00),
    ("anthropic/claude-3-haiku", 0.25, 1.25),
    ("google/gemini-flash-1.5", 0.075, 0.30),
    ("google/gemini-pro-1.5", 1.25, 5.00),
    ("meta-llama/llama-3.1-8b-instruct", 0.05, 0.05),
    ("meta-llama/llama-3.1-70b-instruct", 0.35, 0.40),
    ("mistralai/mistral-nemo", 0.04, 0.10),
    ("deepseek/deepseek-chat", 0.14, 0.28),
];

/// Immutable pricing map, loaded once.
#[derive(Debug, Clone)]
pub struct Pricing {
    models: HashMap<String, ModelPrice>,
}

impl Default for Pricing {
    fn default() -> Self {
        let models = PRICE_TABLE
            .iter()
            .map(|(id, prompt, completion)| {
                (
                    id.to_string(),
                    ModelPrice {
                        prompt_per_million: *prompt,
                        completion_per_million: *completion,
                    },
                )
            })
            .collect();
        Self { models }
    }
}

impl Pricing {
    /// Add or override one model's price (for tests and local gateways).
    pub fn with_model(mut self, id: impl Into<String>, prompt: f64, completion: f64) -> Self {
        self.models.insert(
            id.into(),
            ModelPrice { prompt_per_million: prompt, completion_per_million: completion },
        );
        self
    }

    pub fn price(&self, model: &str) -> Option<ModelPrice> {
        self.models.get(model).copied()
    }

    /// Cost of one call: `(pt/1e6)·pp + (ct/1e6)·cp`, or the flat
    /// fallback when the model is unknown.
    pub fn cost(&self, model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        match self.price(model) {
            Some(price) => {
                (prompt_tokens as f64 / 1_000_000.0) * price.prompt_per_million
                    + (completion_tokens as f64 / 1_000_000.0) * price.completion_per_million
            }
            None => FALLBACK_COST_USD,
        }
    }
}

#[cfg(test)]
#[path = "pricing_tests.rs"]
mod tests;
