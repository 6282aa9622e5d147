// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qntx_core::test_support::simple_attestation;

// =============================================================================
// expansion
// =============================================================================

#[test]
fn single_claim_expansion() {
    let att = simple_attestation("s", "p", "c", "a");
    let claims = expand_attestation(&att);
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].subject, "s");
    assert_eq!(claims[0].predicate, "p");
    assert_eq!(claims[0].context, "c");
    assert_eq!(claims[0].actor, "a");
    assert_eq!(claims[0].attestation_id, att.id);
    assert_eq!(claims[0].timestamp, att.timestamp);
}

#[test]
fn cartesian_count_and_order() {
    let mut att = simple_attestation("s1", "p1", "c1", "a");
    att.subjects.push("s2".into());
    att.predicates.push("p2".into());
    att.contexts.push("c2".into());

    let claims = expand_attestation(&att);
    assert_eq!(claims.len(), 8);

    // Subject-major, predicate-middle, context-minor
    let triples: Vec<(&str, &str, &str)> = claims
        .iter()
        .map(|c| (c.subject.as_str(), c.predicate.as_str(), c.context.as_str()))
        .collect();
    assert_eq!(triples[0], ("s1", "p1", "c1"));
    assert_eq!(triples[1], ("s1", "p1", "c2"));
    assert_eq!(triples[2], ("s1", "p2", "c1"));
    assert_eq!(triples[4], ("s2", "p1", "c1"));

    // Each combination appears exactly once
    let mut unique = triples.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 8);
}

#[test]
fn all_claims_share_primary_actor() {
    let mut att = simple_attestation("s", "p", "c", "first");
    att.actors.push("second".into());
    let claims = expand_attestation(&att);
    assert!(claims.iter().all(|c| c.actor == "first"));
}

proptest::proptest! {
    #[test]
    fn expansion_count_is_the_product(
        subjects in qntx_core::test_support::strategies::fields(),
        predicates in qntx_core::test_support::strategies::fields(),
        contexts in qntx_core::test_support::strategies::fields(),
    ) {
        let mut att = simple_attestation("s", "p", "c", "a");
        att.subjects = subjects;
        att.predicates = predicates;
        att.contexts = contexts;
        let claims = expand_attestation(&att);
        proptest::prop_assert_eq!(
            claims.len(),
            att.subjects.len() * att.predicates.len() * att.contexts.len()
        );
    }
}

// =============================================================================
// literal detection
// =============================================================================

#[yare::parameterized(
    integer = { "42000", true },
    float = { "3.14159", true },
    negative = { "-17.5", true },
    infinity = { "infinity", false },
    boolean_true = { "true", true },
    boolean_false = { "false", true },
    email = { "ada@example.com", true },
    at_without_dot = { "user@localhost", false },
    phone_plus = { "+1 555 0100", true },
    phone_zero = { "0800-123456", true },
    plus_number = { "+4915550100", true },
    years = { "35 years", true },
    y_suffix = { "5 y", true },
    embedded_y_word = { "5y", true },
    yearling_word = { "yearling", false },
    short_code = { "abc", true },
    four_chars = { "abcd", false },
    entity_name = { "warehouse_7", false },
)]
fn literal_contexts(value: &str, expected: bool) {
    assert_eq!(is_literal_context(value), expected, "value: {value:?}");
}
