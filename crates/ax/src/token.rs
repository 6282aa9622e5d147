// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whitespace tokenizer with double-quote grouping.

use crate::error::AxError;
use serde::{Deserialize, Serialize};

/// One input token. Quoted tokens keep embedded spaces and never act as
/// grammar keywords, so reserved words inside quoted template bodies stay
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub quoted: bool,
    /// Zero-based token index, used in parse error details.
    pub position: usize,
}

impl Token {
    /// True when this bare token equals `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        !self.quoted && self.text == keyword
    }
}

/// Split `raw` into tokens. Double quotes group words and are stripped;
/// an unterminated quote is an error.
pub fn tokenize(raw: &str) -> Result<Vec<Token>, AxError> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                text.push(c);
            }
            if !closed {
                return Err(AxError::invalid("unterminated quote", tokens.len()));
            }
            tokens.push(Token { text, quoted: true, position: tokens.len() });
        } else {
            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '"' {
                    break;
                }
                text.push(c);
                chars.next();
            }
            tokens.push(Token { text, quoted: false, position: tokens.len() });
        }
    }
    Ok(tokens)
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
