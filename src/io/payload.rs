//! Read/write raw API payloads.
//!
//! Saving the body of a live request lets a window search be replayed offline
//! (`dw window --payload FILE`) against exactly the data that was fetched.

use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::error::{AppError, EXIT_CONFIG};

/// Read a saved payload as untyped JSON.
pub fn read_payload(path: &Path) -> Result<Value, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to open payload '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Invalid payload JSON '{}': {e}", path.display())))
}

/// Save a payload exactly as received.
pub fn write_payload(path: &Path, raw: &Value) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create payload '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, raw)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write payload JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_survives_save_and_reload() {
        let path = std::env::temp_dir().join(format!("dw_payload_{}.json", std::process::id()));
        let raw = json!({ "response": { "data": [] }, "apiVersion": "2.1.2" });
        write_payload(&path, &raw).unwrap();
        assert_eq!(read_payload(&path).unwrap(), raw);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_json_is_reported() {
        let path = std::env::temp_dir().join(format!("dw_payload_bad_{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_payload(&path).unwrap_err().exit_code(), EXIT_CONFIG);
        let _ = std::fs::remove_file(path);
    }
}
