//! Reading and writing records as JSON files.
//!
//! Files hold the same document [`codec`](crate::codec) produces: one JSON
//! object keyed by field name, with Wire Tags for the kinds JSON has no type
//! for. Writes are pretty-printed and create parent directories as needed.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value as Json;
use tracing::debug;

use crate::codec;
use crate::error::RootConfigError;
use crate::record::Record;
use crate::schema::Schema;

/// Load and validate a record from a JSON file.
pub fn read_record(path: &Path, schema: Arc<Schema>) -> Result<Record, RootConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| RootConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let json: Json = serde_json::from_str(&content).map_err(|e| RootConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let Json::Object(map) = json else {
        return Err(RootConfigError::InvalidValue {
            key: path.display().to_string(),
            reason: "expected a JSON object".into(),
        });
    };
    debug!(path = %path.display(), schema = schema.name(), "read record");
    codec::decode(&map, schema)
}

/// Write a record to `path` as indented JSON, replacing any existing file.
pub fn write_record(path: &Path, record: &Record) -> Result<(), RootConfigError> {
    let mut content = codec::to_text_pretty(record)?;
    content.push('\n');

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| RootConfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, &content).map_err(|e| RootConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), schema = record.schema().name(), "wrote record");
    Ok(())
}
