// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn provider_parse() {
    assert_eq!(Provider::parse("openrouter"), Some(Provider::OpenRouter));
    assert_eq!(Provider::parse("local"), Some(Provider::Local));
    assert_eq!(Provider::parse("azure"), None);
}

#[test]
fn provider_display() {
    assert_eq!(Provider::OpenRouter.to_string(), "openrouter");
    assert_eq!(Provider::Local.to_string(), "local");
}

#[test]
fn default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.provider, Provider::OpenRouter);
    assert!(config.api_key.is_none());
    assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
    assert!(!config.debug);
}

#[test]
fn for_provider_picks_endpoint() {
    let config = ClientConfig::for_provider(Provider::Local);
    assert_eq!(config.base_url, "http://localhost:11434/v1");
}

#[test]
fn setters_chain() {
    let config = ClientConfig::default()
        .api_key("sk-test")
        .default_model("openai/gpt-4o")
        .default_temperature(0.2)
        .debug(true);
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.default_model, "openai/gpt-4o");
    assert!(config.debug);
}
