// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL write-ahead log.

use crate::error::StoreError;
use crate::event::LedgerEvent;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One WAL line: a sequence number, wall-clock stamp, and the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub at_ms: u64,
    pub event: LedgerEvent,
}

/// Append-only JSONL log of [`LedgerEvent`]s.
pub struct Wal {
    path: PathBuf,
    file: File,
    next_seq: u64,
    entries_since_open: u64,
}

impl Wal {
    /// Open (or create) the WAL at `path`, positioned after `last_seq`.
    pub fn open(path: impl Into<PathBuf>, last_seq: u64) -> Result<Self, StoreError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(StoreError::backend)?;
        Ok(Self { path, file, next_seq: last_seq + 1, entries_since_open: 0 })
    }

    /// Replay entries with `seq > after_seq` in order.
    ///
    /// A torn final line (crash mid-append) is dropped with a warning;
    /// corruption anywhere else fails the replay.
    pub fn replay(path: &Path, after_seq: u64) -> Result<Vec<WalEntry>, StoreError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::backend(e)),
        };
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut lines = reader.lines().peekable();
        let mut line_no = 0u64;
        while let Some(line) = lines.next() {
            line_no += 1;
            let line = line.map_err(StoreError::backend)?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(&line) {
                Ok(entry) => {
                    if entry.seq > after_seq {
                        entries.push(entry);
                    }
                }
                Err(e) if lines.peek().is_none() => {
                    tracing::warn!(
                        path = %path.display(),
                        line = line_no,
                        error = %e,
                        "dropping torn trailing WAL line"
                    );
                }
                Err(e) => {
                    return Err(StoreError::Backend {
                        message: format!("corrupt WAL line {}: {}", line_no, e),
                    });
                }
            }
        }
        Ok(entries)
    }

    /// Append one event, flushing to disk before returning.
    pub fn append(&mut self, at_ms: u64, event: LedgerEvent) -> Result<WalEntry, StoreError> {
        let entry = WalEntry { seq: self.next_seq, at_ms, event };
        let mut line = serde_json::to_string(&entry).map_err(StoreError::backend)?;
        line.push('\n');
        self.file.write_all(line.as_bytes()).map_err(StoreError::backend)?;
        self.file.sync_all().map_err(StoreError::backend)?;
        self.next_seq += 1;
        self.entries_since_open += 1;
        Ok(entry)
    }

    /// Last sequence number handed out.
    pub fn last_seq(&self) -> u64 {
        self.next_seq - 1
    }

    /// Entries appended since this handle was opened or last truncated.
    pub fn entries_since_open(&self) -> u64 {
        self.entries_since_open
    }

    /// Truncate the log after a snapshot has captured its contents.
    /// Sequence numbers keep counting from where they were.
    pub fn truncate(&mut self) -> Result<(), StoreError> {
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(StoreError::backend)?;
        self.entries_since_open = 0;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
