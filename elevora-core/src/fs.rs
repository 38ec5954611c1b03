//! Filesystem access for loading saved audit documents.

use std::path::Path;

use crate::domain::{AuditDocument, AuditEnvelope};
use crate::error::Result;

/// Abstraction over filesystem access for testability.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Read a file into a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone)]
pub struct StdFileSystem;

impl StdFileSystem {
    /// Create a new standard filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Load an audit document saved as JSON.
///
/// Accepts both a bare document and the producer's `{"message": ...}`
/// envelope. A top-level `message` key selects the envelope form, and its
/// parse errors are reported as they are.
pub fn load_document<F: FileSystem>(fs: &F, path: &Path) -> Result<AuditDocument> {
    let raw = fs.read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    if value.get("message").is_some() {
        let envelope: AuditEnvelope = serde_json::from_str(&raw)?;
        return Ok(envelope.message);
    }
    AuditDocument::from_json(&raw)
}
