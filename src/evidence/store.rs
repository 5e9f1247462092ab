//! Read-only JSON document store rooted at an evidence pack directory.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only view over an evidence pack directory.
///
/// Documents are parsed fresh on every call; nothing is cached across reads.
#[derive(Debug, Clone)]
pub struct EvidenceStore {
    root: PathBuf,
}

impl EvidenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Evidence pack root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a pack-relative path
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Whether a pack-relative file or directory exists
    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Load and parse a whole document.
    ///
    /// Returns `None` when the file is missing, unreadable or not valid JSON.
    pub fn document(&self, relative: &str) -> Option<Value> {
        let path = self.path(relative);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Ignoring malformed evidence {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Read a single, possibly dotted, field from a document.
    ///
    /// Either the whole path resolves to a concrete value or the result is
    /// `None`; there are no partial reads.
    pub fn read(&self, relative: &str, field: &str) -> Option<Value> {
        let doc = self.document(relative)?;
        lookup_field(&doc, field).cloned()
    }
}

/// Resolve a dotted field path (`summary.critical`) through nested objects.
///
/// Stepping into anything that is not an object yields `None`, and so does a
/// JSON `null` at the end of the path.
pub fn lookup_field<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    let (head, rest) = match field.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (field, None),
    };
    let child = value.as_object()?.get(head)?;
    match rest {
        Some(rest) => lookup_field(child, rest),
        None if child.is_null() => None,
        None => Some(child),
    }
}
