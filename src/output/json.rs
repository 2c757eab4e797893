//! JSON document persistence and statistics

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use super::{OutputError, OutputResult};

/// How [`save_json`] writes a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonWriteOptions {
    /// Indent with two spaces instead of writing a single line
    pub pretty: bool,
    /// Create missing parent directories
    pub ensure_dir: bool,
}

impl Default for JsonWriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            ensure_dir: true,
        }
    }
}

/// Serialize `value` and write it to `path`
///
/// # Errors
/// Returns [`OutputError::SerializationError`] if the value cannot be encoded and
/// [`OutputError::IoError`] if the directory or file cannot be written.
pub fn save_json<T: Serialize + ?Sized>(
    value: &T,
    path: &Path,
    options: JsonWriteOptions,
) -> OutputResult<()> {
    if options.ensure_dir {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::IoError(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let encoded = if options.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| OutputError::SerializationError(e.to_string()))?;

    std::fs::write(path, encoded).map_err(|e| {
        OutputError::IoError(format!("Failed to write {}: {}", path.display(), e))
    })?;

    info!("File saved: {}", path.display());
    Ok(())
}

/// Human-readable byte count with two decimals (e.g., "1.50 KB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, UNITS[unit])
}

/// Size and shape of a JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStats {
    /// Compact serialized size in bytes
    pub size: u64,
    /// `size` formatted with [`format_file_size`]
    pub size_formatted: String,
    /// Top-level entries, for objects and arrays
    pub keys: Option<usize>,
    /// Nesting depth, for objects and arrays
    pub depth: Option<usize>,
}

/// Compute [`JsonStats`] for a serializable value
///
/// # Errors
/// Returns [`OutputError::SerializationError`] if the value cannot be encoded.
pub fn json_stats<T: Serialize + ?Sized>(value: &T) -> OutputResult<JsonStats> {
    let value = serde_json::to_value(value)
        .map_err(|e| OutputError::SerializationError(e.to_string()))?;
    let encoded = serde_json::to_string(&value)
        .map_err(|e| OutputError::SerializationError(e.to_string()))?;
    let size = encoded.len() as u64;

    let keys = match &value {
        Value::Object(map) => Some(map.len()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    };
    let depth = keys.map(|_| depth_of(&value, 0));

    Ok(JsonStats {
        size,
        size_formatted: format_file_size(size),
        keys,
        depth,
    })
}

fn depth_of(value: &Value, depth: usize) -> usize {
    let deepest = match value {
        Value::Object(map) => map.values().map(|child| depth_of(child, depth + 1)).max(),
        Value::Array(items) => items.iter().map(|child| depth_of(child, depth + 1)).max(),
        _ => return depth,
    };

    deepest.unwrap_or(depth)
}
