//! Backup document model.
//!
//! Record shapes are determined entirely by the remote source; rows are
//! carried as opaque JSON values and never validated locally.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag identifying the artifact format
pub const DOCUMENT_KIND: &str = "api_backup";

/// Result of backing up a single resource through the data API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceBackup {
    pub name: String,

    pub record_count: usize,

    pub records: Vec<Value>,

    /// RFC 3339 capture time
    pub captured_at: String,

    /// Set when the fetch failed; implies zero records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResourceBackup {
    pub fn success(name: &str, records: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            record_count: records.len(),
            records,
            captured_at: chrono::Local::now().to_rfc3339(),
            error: None,
        }
    }

    pub fn failure(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            record_count: 0,
            records: Vec::new(),
            captured_at: chrono::Local::now().to_rfc3339(),
            error: Some(error),
        }
    }
}

/// Root artifact produced by the API backup path.
///
/// Both maps keep entries in the configured resource order, so identical
/// inputs produce identical artifacts run over run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupDocument {
    pub kind: String,

    pub captured_at: String,

    pub source_endpoint: String,

    /// Per-resource schema discovery payloads (or error placeholders)
    pub schema: IndexMap<String, Value>,

    /// Per-resource row data, keyed by resource name
    pub resources: IndexMap<String, ResourceBackup>,
}

impl BackupDocument {
    pub fn new(endpoint: &str) -> Self {
        Self {
            kind: DOCUMENT_KIND.to_string(),
            captured_at: chrono::Local::now().to_rfc3339(),
            source_endpoint: endpoint.to_string(),
            schema: IndexMap::new(),
            resources: IndexMap::new(),
        }
    }
}
