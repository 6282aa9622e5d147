// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `so` action parser: a linear token scan with an explicit state variable.

use crate::error::DispatchError;
use chrono::{DateTime, Utc};
use qntx_ax::Token;
use qntx_core::AxFilter;
use serde::{Deserialize, Serialize};

/// Payload of a `so csv` export job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvPayload {
    pub filter: AxFilter,
    pub filename: String,
    /// Single-character field delimiter.
    pub delimiter: char,
    /// Header override; `None` uses the default header set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
}

impl Default for CsvPayload {
    fn default() -> Self {
        Self {
            filter: AxFilter::all(),
            filename: String::new(),
            delimiter: ',',
            headers: None,
        }
    }
}

/// Payload of a `so prompt` pipeline job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub filter: AxFilter,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<String>,
    /// Schedule watermark: strict lower bound applied to the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_cursor: Option<DateTime<Utc>>,
}

/// A parsed `so` action ready to become a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum Action {
    Csv(CsvPayload),
    Prompt(PromptPayload),
}

impl Action {
    /// Registry name of the handler that executes this action.
    pub fn handler_name(&self) -> &'static str {
        match self {
            Action::Csv(_) => crate::HANDLER_CSV,
            Action::Prompt(_) => crate::HANDLER_PROMPT,
        }
    }

    /// Serialize into an opaque job payload.
    pub fn to_payload(&self) -> serde_json::Value {
        match self {
            Action::Csv(p) => serde_json::to_value(p).unwrap_or_default(),
            Action::Prompt(p) => serde_json::to_value(p).unwrap_or_default(),
        }
    }
}

/// Parse the token tail after `so` into an action over `filter`.
pub fn parse_action(filter: AxFilter, tokens: &[Token]) -> Result<Action, DispatchError> {
    let verb = tokens
        .first()
        .ok_or_else(|| DispatchError::invalid("empty action", 0))?;
    match verb.text.as_str() {
        "csv" if !verb.quoted => parse_csv(filter, &tokens[1..], verb.position),
        "prompt" if !verb.quoted => parse_prompt(filter, &tokens[1..], verb.position),
        other => Err(DispatchError::invalid(
            format!("unknown action verb {other:?}"),
            verb.position,
        )),
    }
}

fn parse_csv(
    filter: AxFilter,
    tokens: &[Token],
    verb_position: usize,
) -> Result<Action, DispatchError> {
    let filename = tokens
        .first()
        .ok_or_else(|| DispatchError::invalid("csv requires a filename", verb_position))?;
    let mut payload = CsvPayload {
        filter,
        filename: filename.text.clone(),
        ..CsvPayload::default()
    };

    let mut iter = tokens[1..].iter();
    while let Some(token) = iter.next() {
        if token.is_keyword("delimiter") {
            let value = iter.next().ok_or_else(|| {
                DispatchError::invalid("missing value after `delimiter`", token.position)
            })?;
            let mut chars = value.text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => payload.delimiter = c,
                _ => {
                    return Err(DispatchError::invalid(
                        format!("delimiter must be exactly one character, got {:?}", value.text),
                        value.position,
                    ));
                }
            }
        } else if token.is_keyword("headers") {
            let value = iter.next().ok_or_else(|| {
                DispatchError::invalid("missing value after `headers`", token.position)
            })?;
            let headers: Vec<String> = value
                .text
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect();
            if headers.is_empty() {
                return Err(DispatchError::invalid("empty header list", value.position));
            }
            payload.headers = Some(headers);
        } else {
            return Err(DispatchError::invalid(
                format!("unexpected token {:?}", token.text),
                token.position,
            ));
        }
    }
    Ok(Action::Csv(payload))
}

/// Accumulation state for the prompt grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptState {
    Template,
    System,
    Done,
}

fn parse_prompt(
    filter: AxFilter,
    tokens: &[Token],
    verb_position: usize,
) -> Result<Action, DispatchError> {
    let mut payload = PromptPayload { filter, ..PromptPayload::default() };
    let mut state = PromptState::Template;
    let mut template_words: Vec<String> = Vec::new();
    let mut system_words: Vec<String> = Vec::new();

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        // Keywords flush the accumulator and switch state; quoted tokens
        // are always payload.
        if token.is_keyword("with") {
            if state != PromptState::Template {
                return Err(DispatchError::invalid("`with` after system prompt", token.position));
            }
            state = PromptState::System;
            continue;
        }
        if token.is_keyword("model")
            || token.is_keyword("provider")
            || token.is_keyword("predicate")
        {
            let keyword = token.text.clone();
            let value = iter.next().ok_or_else(|| {
                DispatchError::invalid(format!("missing value after `{keyword}`"), token.position)
            })?;
            match keyword.as_str() {
                "model" => payload.model = Some(value.text.clone()),
                "provider" => {
                    if !matches!(value.text.as_str(), "openrouter" | "local") {
                        return Err(DispatchError::invalid(
                            format!("unknown provider {:?}", value.text),
                            value.position,
                        ));
                    }
                    payload.provider = Some(value.text.clone());
                }
                _ => payload.result_predicate = Some(value.text.clone()),
            }
            state = PromptState::Done;
            continue;
        }

        match state {
            PromptState::Template => template_words.push(token.text.clone()),
            PromptState::System => system_words.push(token.text.clone()),
            PromptState::Done => {
                return Err(DispatchError::invalid(
                    format!("unexpected token {:?}", token.text),
                    token.position,
                ));
            }
        }
    }

    if template_words.is_empty() {
        return Err(DispatchError::invalid("empty prompt template", verb_position));
    }
    payload.template = template_words.join(" ");
    if !system_words.is_empty() {
        payload.system_prompt = Some(system_words.join(" "));
    }
    Ok(Action::Prompt(payload))
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
