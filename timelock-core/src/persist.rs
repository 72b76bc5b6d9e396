#![forbid(unsafe_code)]

//! JSON persistence helpers for moduli, puzzles and proofs exchanged as files.

use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

use crate::TimelockResult;

/// Read and decode a JSON file.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> TimelockResult<T> {
    let data = fs::read(&path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Encode `value` as pretty JSON and write it to `path`, replacing any existing file.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> TimelockResult<()> {
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(&path, data)?;
    tracing::debug!(path = %path.as_ref().display(), "wrote json");
    Ok(())
}
