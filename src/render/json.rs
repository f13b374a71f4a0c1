//! JSON rendering for processing results.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::ProcessingResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a result to a `{title, outline, language}` JSON record.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(result: &ProcessingResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render a result and write it to `path`, creating parent directories.
pub fn write_json<P: AsRef<Path>>(
    result: &ProcessingResult,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = to_json(result, format)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
