/// Record file loading: every input is a JSON array of core records.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::bail;

/// Parse a JSON array of records. An empty or whitespace-only string is an
/// empty list.
pub fn parse_records<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, serde_json::Error> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
}

/// Load a JSON array of records from `path`. `what` names the records in
/// error messages ("entities", "comparisons", ...).
pub fn load_records<T: DeserializeOwned>(path: &Path, what: &str) -> Vec<T> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read {what} file {}: {e}", path.display())));
    parse_records(&content)
        .unwrap_or_else(|e| bail(format!("Failed to parse {what} in {}: {e}", path.display())))
}
