use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::model::structures::record::Record;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read records file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed records payload: {0}")]
    Malformed(#[from] serde_json::Error)
}

/// Top-level shape of an exported records payload.
#[derive(Debug, Deserialize)]
pub struct RecordsPayload {
    #[serde(default)]
    pub records: Vec<Record>
}

/// Loads a records payload from a JSON file on disk.
pub fn load_records(path: &Path) -> Result<Vec<Record>, SourceError> {
    let raw = fs::read_to_string(path)?;

    parse_records(&raw)
}

/// Decodes a records payload from raw JSON text.
pub fn parse_records(raw: &str) -> Result<Vec<Record>, SourceError> {
    let payload: RecordsPayload = serde_json::from_str(raw)?;

    Ok(payload.records)
}
