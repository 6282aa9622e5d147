// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenAI-compatible chat client.

use crate::config::{ClientConfig, Provider};
use crate::error::LlmError;
use crate::http::{HttpDoer, ReqwestDoer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One chat call. Unset fields fall back to the client's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Token accounting reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Chat completion result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Model that actually served the request.
    pub model: String,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Chat endpoint client. Request/response bodies are JSON; the HTTP layer
/// is injected via [`HttpDoer`].
#[derive(Clone)]
pub struct ChatClient {
    config: ClientConfig,
    doer: Arc<dyn HttpDoer>,
}

impl ChatClient {
    /// Client over the production reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_doer(config, Arc::new(ReqwestDoer::new()))
    }

    /// Client over an injected transport.
    pub fn with_doer(config: ClientConfig, doer: Arc<dyn HttpDoer>) -> Self {
        Self { config, doer }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Model used when neither the request nor its metadata names one.
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Send one chat request.
    ///
    /// Fails with `NotConfigured` before any I/O when the provider
    /// requires an api key and none is set.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let api_key = match (&self.config.provider, &self.config.api_key) {
            (Provider::Local, key) => key.clone(),
            (_, Some(key)) if !key.is_empty() => Some(key.clone()),
            _ => return Err(LlmError::NotConfigured { field: "api_key" }),
        };

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": request.user_prompt}));

        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": request.temperature.unwrap_or(self.config.default_temperature),
            "max_tokens": request.max_tokens.unwrap_or(self.config.default_max_tokens),
        });

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(key) = api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {key}")));
        }

        if self.config.debug {
            tracing::debug!(url = %url, body = %body, "chat request");
        }

        let response = self.doer.post_json(&url, &headers, &body).await?;

        if self.config.debug {
            tracing::debug!(status = response.status, body = %response.body, "chat response");
        }

        if response.status >= 400 {
            return Err(LlmError::Remote { status: response.status, body: response.body });
        }

        let wire: WireResponse = serde_json::from_str(&response.body)
            .map_err(|e| LlmError::Invalid { message: format!("malformed response: {e}") })?;
        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Invalid { message: "empty choices".to_string() })?;
        let content = choice.message.content.unwrap_or_default();
        let usage = wire.usage.unwrap_or_default();

        tracing::debug!(
            model = %model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completed"
        );

        Ok(ChatResponse {
            content,
            usage,
            model: wire.model.unwrap_or(model),
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
