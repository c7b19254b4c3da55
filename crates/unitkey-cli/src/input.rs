//! Record input helpers.

use std::io::{self, Read};

use tracing::debug;
use unitkey_canonical::CompilationRecord;

/// Reads a JSON compilation record from `path`, or stdin when `None`.
pub fn read_record(
    path: Option<&str>,
) -> Result<CompilationRecord, Box<dyn std::error::Error>> {
    let json_str = if let Some(path) = path {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let record: CompilationRecord =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid record JSON: {}", e))?;
    debug!(
        inputs = record.required_inputs.len(),
        sources = record.source_files.len(),
        details = record.details.len(),
        "read compilation record"
    );
    Ok(record)
}
