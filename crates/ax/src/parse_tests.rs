// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qntx_core::test_support::ts;

#[test]
fn empty_query_matches_all() {
    let parsed = parse_ax("").unwrap();
    assert!(parsed.filter.is_unconstrained());
    assert!(parsed.action.is_none());
}

#[test]
fn bare_tokens_are_subjects() {
    let parsed = parse_ax("ALICE BOB").unwrap();
    assert_eq!(parsed.filter.subjects, vec!["ALICE", "BOB"]);
}

#[test]
fn keywords_switch_dimensions() {
    let parsed = parse_ax("ALICE is inventory knows in fridge by smartfridge_001").unwrap();
    assert_eq!(parsed.filter.subjects, vec!["ALICE"]);
    assert_eq!(parsed.filter.predicates, vec!["inventory", "knows"]);
    assert_eq!(parsed.filter.contexts, vec!["fridge"]);
    assert_eq!(parsed.filter.actors, vec!["smartfridge_001"]);
}

#[test]
fn since_until_limit() {
    let parsed =
        parse_ax("since 2024-06-01T00:00:00Z until 2024-06-30T00:00:00Z limit 25").unwrap();
    assert_eq!(parsed.filter.since, Some(ts("2024-06-01T00:00:00Z")));
    assert_eq!(parsed.filter.until, Some(ts("2024-06-30T00:00:00Z")));
    assert_eq!(parsed.filter.limit, Some(25));
}

#[test]
fn wildcard_leaves_dimension_open() {
    let parsed = parse_ax("* is inventory").unwrap();
    assert!(parsed.filter.subjects.is_empty());
    assert_eq!(parsed.filter.predicates, vec!["inventory"]);
}

#[test]
fn so_splits_action_tail() {
    let parsed = parse_ax("ALICE so csv out.csv").unwrap();
    assert_eq!(parsed.filter.subjects, vec!["ALICE"]);
    let action = parsed.action.unwrap();
    let texts: Vec<&str> = action.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["csv", "out.csv"]);
}

#[test]
fn quoted_so_stays_in_filter() {
    let parsed = parse_ax(r#""so" is inventory"#).unwrap();
    assert_eq!(parsed.filter.subjects, vec!["so"]);
    assert!(parsed.action.is_none());
}

#[test]
fn quoted_subject_keeps_spaces() {
    let parsed = parse_ax(r#""New York" is located_in"#).unwrap();
    assert_eq!(parsed.filter.subjects, vec!["New York"]);
}

#[yare::parameterized(
    trailing_so = { "ALICE so" },
    trailing_since = { "ALICE since" },
    trailing_limit = { "ALICE limit" },
    bad_timestamp = { "since not-a-time" },
    bad_limit = { "limit many" },
)]
fn malformed_inputs(input: &str) {
    let err = parse_ax(input).unwrap_err();
    assert_eq!(err.kind(), qntx_core::ErrorKind::Invalid);
}

#[test]
fn parse_error_carries_position_detail() {
    let err = parse_ax("a b since").unwrap_err();
    let details = err.details();
    assert!(details.iter().any(|d| d.key == "position" && d.value == "2"));
}
