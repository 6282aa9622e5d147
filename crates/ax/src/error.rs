// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ax error types.

use qntx_core::{detail, Detail, ErrorKind};
use qntx_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AxError {
    #[error("invalid query: {message} (token {position})")]
    Invalid { message: String, position: usize },

    #[error(transparent)]
    Backend(#[from] StoreError),

    #[error("query canceled")]
    Canceled,
}

impl AxError {
    pub fn invalid(message: impl Into<String>, position: usize) -> Self {
        AxError::Invalid { message: message.into(), position }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AxError::Invalid { .. } => ErrorKind::Invalid,
            AxError::Backend(err) => err.kind(),
            AxError::Canceled => ErrorKind::Canceled,
        }
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            AxError::Invalid { message, position } => {
                vec![detail("message", message), detail("position", position)]
            }
            AxError::Backend(err) => err.details(),
            AxError::Canceled => vec![],
        }
    }
}
