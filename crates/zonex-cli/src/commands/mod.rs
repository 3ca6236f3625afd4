pub mod check;
pub mod extract;
pub mod geoids;

use std::fs;
use std::path::Path;

use zonex_core::error::ZonexError;

/// Read a file produced by `extract` back in as JSON.
pub fn read_json(path: &Path) -> Result<serde_json::Value, ZonexError> {
    let text = fs::read_to_string(path).map_err(|e| ZonexError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| ZonexError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
