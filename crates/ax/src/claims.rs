// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim expansion and context-literal detection.

use qntx_core::{Attestation, Claim};

/// Expand an attestation into its claims: the cartesian product of
/// subjects × predicates × contexts, one claim per combination, all
/// sharing the attestation's primary actor and timestamp.
///
/// Order is stable: subject-major, predicate-middle, context-minor,
/// matching input order.
pub fn expand_attestation(att: &Attestation) -> Vec<Claim> {
    let actor = att.actor().to_string();
    let mut claims = Vec::with_capacity(att.claim_count());
    for subject in &att.subjects {
        for predicate in &att.predicates {
            for context in &att.contexts {
                claims.push(Claim {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    context: context.clone(),
                    actor: actor.clone(),
                    timestamp: att.timestamp,
                    attestation_id: att.id,
                });
            }
        }
    }
    claims
}

/// True when an alphabetic word in `value` equals `word`.
fn has_word(value: &str, word: &str) -> bool {
    value
        .split(|c: char| !c.is_ascii_alphabetic())
        .any(|w| w.eq_ignore_ascii_case(word))
}

/// Heuristic: is this context value a literal (attached as metadata on the
/// subject node) rather than an entity reference?
///
/// Literals are: finite numbers, booleans, email-shaped strings, phone-
/// shaped strings, durations mentioning `years`/`y`, and anything of
/// length ≤ 3.
pub fn is_literal_context(value: &str) -> bool {
    if value.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
        return true;
    }
    if value.parse::<bool>().is_ok() {
        return true;
    }
    // Email heuristic
    if value.contains('@') && value.contains('.') {
        return true;
    }
    // Phone heuristic
    if (value.starts_with('+') || value.starts_with('0'))
        && value.chars().any(|c| c == '-' || c == ' ')
    {
        return true;
    }
    // Duration heuristic
    if has_word(value, "years") || has_word(value, "y") {
        return true;
    }
    value.chars().count() <= 3
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
