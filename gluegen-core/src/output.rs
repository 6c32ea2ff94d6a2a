//! JSON file input and output.
//!
//! Everything gluegen writes goes through [`save_json`]: 4-space indentation
//! with object keys in sorted order, so two runs over the same catalog state
//! produce byte-identical files.

use crate::error::GlueGenError;
use crate::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Serializes `value` with 4-space indentation and sorted keys.
pub fn to_sorted_json<T: Serialize>(value: &T) -> Result<String> {
    // Going through Value first sorts keys regardless of T's field order.
    let value = serde_json::to_value(value)
        .map_err(|e| GlueGenError::serialization("JSON conversion", e))?;

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| GlueGenError::serialization("JSON serialization", e))?;

    String::from_utf8(buffer).map_err(|e| GlueGenError::Io {
        context: "Serialized JSON was not valid UTF-8".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Writes `value` as sorted, indented JSON, replacing any existing file.
pub async fn save_json<T: Serialize>(value: &T, output_path: &Path) -> Result<()> {
    let json_data = to_sorted_json(value)?;
    tokio::fs::write(output_path, json_data)
        .await
        .map_err(|e| GlueGenError::io("write to", output_path, e))?;
    Ok(())
}

/// Reads and parses a JSON file.
pub async fn load_json<T: DeserializeOwned>(input_path: &Path) -> Result<T> {
    let contents = tokio::fs::read_to_string(input_path)
        .await
        .map_err(|e| GlueGenError::io("read", input_path, e))?;
    serde_json::from_str(&contents).map_err(|e| {
        GlueGenError::serialization(format!("Failed to parse {}", input_path.display()), e)
    })
}
