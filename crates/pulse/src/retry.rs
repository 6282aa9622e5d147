// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry classification and backoff.

use qntx_core::ErrorKind;
use qntx_dispatch::HandlerError;
use std::time::Duration;

/// Message fragments marking a transient network failure.
const RETRYABLE_PATTERNS: &[&str] = &[
    "dns",
    "connection reset",
    "connection refused",
    "timeout",
    "i/o timeout",
    "network is unreachable",
    "temporary failure",
];

/// Classify a raw error message: transient network failures retry.
pub fn is_retryable_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RETRYABLE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Classify a handler error. Transient kinds retry; authentication
/// failures, malformed payloads, invalid templates, and bounded-actor
/// violations are terminal.
pub fn is_retryable(error: &HandlerError) -> bool {
    match error.kind {
        ErrorKind::Backend | ErrorKind::Busy => true,
        ErrorKind::Canceled
        | ErrorKind::Invalid
        | ErrorKind::NotConfigured
        | ErrorKind::BoundedActor
        | ErrorKind::Duplicate
        | ErrorKind::NotFound
        | ErrorKind::NotRegistered
        | ErrorKind::Remote => false,
    }
}

/// Deterministic jitter factor in [0.75, 1.25], derived from the job id
/// and attempt count (FNV-1a) so retry timing is exactly testable.
fn jitter_factor(job_id: &str, attempts: u32) -> f64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in job_id.bytes().chain(attempts.to_le_bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    0.75 + (hash % 1_000) as f64 / 1_000.0 * 0.5
}

/// Backoff before the next attempt: `min(base · 2^attempts, cap)` with
/// ±25% jitter.
pub fn backoff_ms(job_id: &str, attempts: u32, base: Duration, cap: Duration) -> u64 {
    let base_ms = base.as_millis() as u64;
    let cap_ms = cap.as_millis() as u64;
    let exp = base_ms.saturating_mul(1u64 << attempts.min(32)).min(cap_ms);
    (exp as f64 * jitter_factor(job_id, attempts)) as u64
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
