// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat client configuration.

use serde::{Deserialize, Serialize};

/// Which endpoint family the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Hosted OpenAI-compatible gateway; requires an api key.
    #[default]
    OpenRouter,
    /// Local OpenAI-compatible server (no key required).
    Local,
}

impl Provider {
    /// Parse a provider name as it appears in `so prompt … provider <p>`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openrouter" => Some(Provider::OpenRouter),
            "local" => Some(Provider::Local),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::Local => "http://localhost:11434/v1",
        }
    }
}

qntx_core::simple_display! {
    Provider {
        OpenRouter => "openrouter",
        Local => "local",
    }
}

/// Configuration for [`crate::ChatClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub default_temperature: f64,
    pub default_max_tokens: u32,
    /// Log request/response bodies at debug level.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let provider = Provider::OpenRouter;
        Self {
            provider,
            api_key: None,
            base_url: provider.default_base_url().to_string(),
            default_model: "openai/gpt-4o-mini".to_string(),
            default_temperature: 0.7,
            default_max_tokens: 1024,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Config for a given provider with its default endpoint.
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            ..Self::default()
        }
    }

    qntx_core::setters! {
        into {
            base_url: String,
            default_model: String,
        }
        set {
            provider: Provider,
            default_temperature: f64,
            default_max_tokens: u32,
            debug: bool,
        }
        option {
            api_key: String,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
