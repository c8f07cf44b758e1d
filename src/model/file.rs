//! File metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::HasId;
use super::{Folder, Ref, User};

/// Metadata of a stored file. The content itself lives in the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Direct download URL served by the backend.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub folder: Option<Ref<Folder>>,
    /// User the file was uploaded for.
    #[serde(default)]
    pub cliente_destinatario: Option<Ref<User>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl HasId for FileEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl FileEntry {
    /// Human-readable size such as `1.5 MB`.
    pub fn display_size(&self) -> String {
        match self.size {
            Some(bytes) => format_size(bytes),
            None => "-".to_string(),
        }
    }
}

/// Format a byte count using binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
