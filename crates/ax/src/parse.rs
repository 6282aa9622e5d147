// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ax query parser: a linear token scan with an explicit state variable.

use crate::error::AxError;
use crate::token::{tokenize, Token};
use chrono::{DateTime, Utc};
use qntx_core::AxFilter;

/// Result of parsing a raw Ax input: the filter, plus any `so` action tail
/// left for the dispatch layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub filter: AxFilter,
    /// Tokens after `so`, verbatim (quote flags preserved).
    pub action: Option<Vec<Token>>,
}

/// Which dimension bare tokens currently accumulate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Subjects,
    Predicates,
    Contexts,
    Actors,
}

fn parse_bound(token: &Token, keyword: &str) -> Result<DateTime<Utc>, AxError> {
    DateTime::parse_from_rfc3339(&token.text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            AxError::invalid(format!("bad {keyword} timestamp {:?}: {e}", token.text), token.position)
        })
}

/// Parse a raw Ax query string.
///
/// Grammar: `[subjects…] [is <predicates…>] [in <contexts…>] [by <actors…>]
/// [since <rfc3339>] [until <rfc3339>] [limit <n>] [so <action…>]`.
/// A bare `*` matches everything in its dimension.
pub fn parse_ax(raw: &str) -> Result<ParsedQuery, AxError> {
    let tokens = tokenize(raw)?;
    let mut filter = AxFilter::all();
    let mut state = ScanState::Subjects;
    let mut action = None;

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        if token.is_keyword("so") {
            let tail: Vec<Token> = iter.collect();
            if tail.is_empty() {
                return Err(AxError::invalid("missing action after `so`", token.position));
            }
            action = Some(tail);
            break;
        }

        if token.is_keyword("is") {
            state = ScanState::Predicates;
            continue;
        }
        if token.is_keyword("in") {
            state = ScanState::Contexts;
            continue;
        }
        if token.is_keyword("by") {
            state = ScanState::Actors;
            continue;
        }
        if token.is_keyword("since") || token.is_keyword("until") {
            let keyword = token.text.clone();
            let value = iter.next().ok_or_else(|| {
                AxError::invalid(format!("missing value after `{keyword}`"), token.position)
            })?;
            let bound = parse_bound(&value, &keyword)?;
            if keyword == "since" {
                filter.since = Some(bound);
            } else {
                filter.until = Some(bound);
            }
            continue;
        }
        if token.is_keyword("limit") {
            let value = iter.next().ok_or_else(|| {
                AxError::invalid("missing value after `limit`", token.position)
            })?;
            let n: usize = value.text.parse().map_err(|_| {
                AxError::invalid(format!("bad limit {:?}", value.text), value.position)
            })?;
            filter.limit = Some(n);
            continue;
        }

        // Bare `*` leaves the dimension unconstrained
        if !token.quoted && token.text == "*" {
            continue;
        }

        match state {
            ScanState::Subjects => filter.subjects.push(token.text),
            ScanState::Predicates => filter.predicates.push(token.text),
            ScanState::Contexts => filter.contexts.push(token.text),
            ScanState::Actors => filter.actors.push(token.text),
        }
    }

    Ok(ParsedQuery { filter, action })
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
