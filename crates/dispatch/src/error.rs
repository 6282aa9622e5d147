// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch and handler error types.

use qntx_ax::AxError;
use qntx_core::{detail, Detail, ErrorKind};
use qntx_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error("invalid action: {message} (token {position})")]
    Invalid { message: String, position: usize },

    #[error("no handler registered for {name}")]
    NotRegistered { name: String },

    #[error("no ingestion handler for script type {script_type}")]
    NoIngestHandler { script_type: String },

    #[error(transparent)]
    Backend(#[from] StoreError),
}

impl DispatchError {
    pub fn invalid(message: impl Into<String>, position: usize) -> Self {
        DispatchError::Invalid { message: message.into(), position }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Invalid { .. } => ErrorKind::Invalid,
            DispatchError::NotRegistered { .. } => ErrorKind::NotRegistered,
            DispatchError::NoIngestHandler { .. } => ErrorKind::NotRegistered,
            DispatchError::Backend(err) => err.kind(),
        }
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            DispatchError::Invalid { message, position } => {
                vec![detail("message", message), detail("position", position)]
            }
            DispatchError::NotRegistered { name } => vec![detail("handler", name)],
            DispatchError::NoIngestHandler { script_type } => {
                vec![detail("script_type", script_type)]
            }
            DispatchError::Backend(err) => err.details(),
        }
    }
}

/// Uniform error surface for handler execution: a boundary kind, a human
/// message, and the ordered detail pairs. Workers classify retryability
/// from the kind and message.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct HandlerError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Vec<Detail>,
}

impl HandlerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), details: Vec::new() }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl std::fmt::Display) -> Self {
        self.details.push(detail(key, value));
        self
    }

    /// Cooperative-cancellation sentinel.
    pub fn canceled() -> Self {
        Self::new(ErrorKind::Canceled, "canceled")
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        Self { kind: err.kind(), message: err.to_string(), details: err.details() }
    }
}

impl From<AxError> for HandlerError {
    fn from(err: AxError) -> Self {
        Self { kind: err.kind(), message: err.to_string(), details: err.details() }
    }
}

impl From<DispatchError> for HandlerError {
    fn from(err: DispatchError) -> Self {
        Self { kind: err.kind(), message: err.to_string(), details: err.details() }
    }
}
