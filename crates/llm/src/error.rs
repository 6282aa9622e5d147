// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LLM client error types.

use qntx_core::{detail, Detail, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("missing required configuration: {field}")]
    NotConfigured { field: &'static str },

    #[error("invalid response: {message}")]
    Invalid { message: String },

    #[error("remote error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("network error: {message}")]
    Network { message: String },
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::NotConfigured { .. } => ErrorKind::NotConfigured,
            LlmError::Invalid { .. } => ErrorKind::Invalid,
            LlmError::Remote { .. } => ErrorKind::Remote,
            // Network failures are transient from the caller's view
            LlmError::Network { .. } => ErrorKind::Backend,
        }
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            LlmError::NotConfigured { field } => vec![detail("field", field)],
            LlmError::Invalid { message } => vec![detail("message", message)],
            LlmError::Remote { status, body } => {
                vec![detail("status", status), detail("body", body)]
            }
            LlmError::Network { message } => vec![detail("message", message)],
        }
    }
}
