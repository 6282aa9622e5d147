// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error types.

use qntx_core::{detail, Detail, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("attestation {id} already exists with different content")]
    Duplicate { id: String },

    #[error("actor {actor} would exceed {bound} distinct contexts")]
    BoundedActor {
        actor: String,
        contexts: Vec<String>,
        bound: usize,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("job {id} cannot move from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    #[error("queue is full ({depth} jobs queued)")]
    Busy { depth: usize },

    #[error("backend failure: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Duplicate { .. } => ErrorKind::Duplicate,
            StoreError::BoundedActor { .. } => ErrorKind::BoundedActor,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidTransition { .. } => ErrorKind::Invalid,
            StoreError::Busy { .. } => ErrorKind::Busy,
            StoreError::Backend { .. } => ErrorKind::Backend,
        }
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            StoreError::Duplicate { id } => vec![detail("attestation_id", id)],
            StoreError::BoundedActor { actor, contexts, bound } => vec![
                detail("actor", actor),
                detail("contexts", contexts.join(",")),
                detail("bound", bound),
            ],
            StoreError::NotFound { entity, id } => {
                vec![detail("entity", entity), detail("id", id)]
            }
            StoreError::InvalidTransition { id, from, to } => {
                vec![detail("job_id", id), detail("from", from), detail("to", to)]
            }
            StoreError::Busy { depth } => vec![detail("depth", depth)],
            StoreError::Backend { message } => vec![detail("message", message)],
        }
    }

    pub(crate) fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend { message: err.to_string() }
    }
}
