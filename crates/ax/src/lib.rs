// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-ax: the Ax query language over attestations.
//!
//! An Ax query is a linear token scan: bare leading tokens are subjects,
//! `is` switches to predicates, `in` to contexts, `by` to actors,
//! `since`/`until` take RFC 3339 bounds, `limit` a count, and `so` hands
//! the remaining tokens to the dispatch layer as an action.

mod alias;
mod claims;
mod error;
mod executor;
mod parse;
mod token;
mod types;

pub use alias::{AliasResolver, Dimension, MapAliases, NoAliases};
pub use claims::{expand_attestation, is_literal_context};
pub use error::AxError;
pub use executor::{AxExecutor, QueryResult, QueryStats};
pub use parse::{parse_ax, ParsedQuery};
pub use token::{tokenize, Token};
pub use types::{resolve_types, TypeMaps};
