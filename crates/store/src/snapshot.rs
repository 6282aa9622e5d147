// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! zstd-compressed state snapshots.

use crate::error::StoreError;
use crate::state::MaterializedState;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 3;

/// Point-in-time capture of the materialized state plus the WAL sequence
/// it reflects. Startup loads the snapshot and replays entries after
/// `wal_seq`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub wal_seq: u64,
    pub state: MaterializedState,
}

impl Snapshot {
    pub fn new(wal_seq: u64, state: MaterializedState) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, wal_seq, state }
    }

    /// Write the snapshot atomically (temp file + rename).
    pub fn write(&self, path: &Path) -> Result<(), StoreError> {
        let tmp = path.with_extension("tmp");
        {
            let file = File::create(&tmp).map_err(StoreError::backend)?;
            let writer = BufWriter::new(file);
            let encoder =
                zstd::stream::Encoder::new(writer, ZSTD_LEVEL).map_err(StoreError::backend)?;
            let encoder = encoder.auto_finish();
            serde_json::to_writer(encoder, self).map_err(StoreError::backend)?;
        }
        std::fs::rename(&tmp, path).map_err(StoreError::backend)?;
        Ok(())
    }

    /// Load a snapshot; `Ok(None)` when none exists yet.
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::backend(e)),
        };
        let reader = BufReader::new(file);
        let decoder = zstd::stream::Decoder::new(reader).map_err(StoreError::backend)?;
        let snapshot: Snapshot = serde_json::from_reader(decoder).map_err(StoreError::backend)?;
        if snapshot.version != CURRENT_SNAPSHOT_VERSION {
            return Err(StoreError::Backend {
                message: format!("unsupported snapshot version {}", snapshot.version),
            });
        }
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
