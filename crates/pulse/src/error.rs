// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler error types.

use qntx_core::{detail, Detail, ErrorKind};
use qntx_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PulseError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("job {id} not found")]
    JobNotFound { id: String },

    #[error("scheduler is shut down")]
    ShutDown,
}

impl PulseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PulseError::Store(err) => err.kind(),
            PulseError::JobNotFound { .. } => ErrorKind::NotFound,
            PulseError::ShutDown => ErrorKind::Canceled,
        }
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            PulseError::Store(err) => err.details(),
            PulseError::JobNotFound { id } => vec![detail("job_id", id)],
            PulseError::ShutDown => vec![],
        }
    }
}
