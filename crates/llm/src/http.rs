// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injectable HTTP transport for the chat client.

use crate::error::LlmError;
use async_trait::async_trait;

/// A raw HTTP response: status plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// JSON-posting transport. Injectable so tests substitute canned
/// responses and deployments can enforce SSRF-safe policies.
#[async_trait]
pub trait HttpDoer: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, LlmError>;
}

/// Production transport over a shared reqwest client.
#[derive(Clone, Default)]
pub struct ReqwestDoer {
    client: reqwest::Client,
}

impl ReqwestDoer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpDoer for ReqwestDoer {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, LlmError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Network { message: "timeout".to_string() }
            } else {
                LlmError::Network { message: e.to_string() }
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Network { message: e.to_string() })?;
        Ok(HttpResponse { status, body })
    }
}
