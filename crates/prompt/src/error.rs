// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt pipeline error types.

use qntx_core::{detail, Detail, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder {{{{{name}}}}}")]
    UnknownPlaceholder { name: String },

    #[error("unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },

    #[error("empty placeholder at byte {offset}")]
    Empty { offset: usize },
}

impl TemplateError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Invalid
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            TemplateError::UnknownPlaceholder { name } => vec![detail("placeholder", name)],
            TemplateError::Unterminated { offset } => vec![detail("offset", offset)],
            TemplateError::Empty { offset } => vec![detail("offset", offset)],
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PromptError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid frontmatter: {message}")]
    Frontmatter { message: String },

    #[error("invalid prompt payload: {message}")]
    Payload { message: String },
}

impl PromptError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Invalid
    }

    pub fn details(&self) -> Vec<Detail> {
        match self {
            PromptError::Template(err) => err.details(),
            PromptError::Frontmatter { message } => vec![detail("message", message)],
            PromptError::Payload { message } => vec![detail("message", message)],
        }
    }
}
