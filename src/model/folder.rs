//! Folder types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::HasId;
use super::{Category, FileEntry, Ref, User};

/// A folder as returned by the backend.
///
/// `subcarpetas` is only populated by the hierarchy endpoint; flat listings
/// link children to parents through `parent_folder` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Folder name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Access category.
    #[serde(default)]
    pub category: Option<Category>,
    /// Parent folder (None for root folders).
    #[serde(default)]
    pub parent_folder: Option<Ref<Folder>>,
    /// Nested subfolders, when the endpoint populates them.
    #[serde(default)]
    pub subcarpetas: Vec<Folder>,
    /// Files stored directly in this folder.
    #[serde(default)]
    pub files: Vec<Ref<FileEntry>>,
    /// Users explicitly assigned to this folder.
    #[serde(default)]
    pub usuarios: Vec<Ref<User>>,
    /// When the folder was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the folder was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HasId for Folder {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Folder {
    /// Id of the parent folder, whichever form the reference arrived in.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_folder.as_ref().map(|p| p.id())
    }

    /// Whether this is a top-level folder.
    pub fn is_root(&self) -> bool {
        self.parent_folder.is_none()
    }

    /// Number of files stored directly in this folder.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Category, falling back to the default category.
    pub fn category_or_default(&self) -> Category {
        self.category.unwrap_or_default()
    }
}

/// Data for creating a new folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder id (serialized as `null` for root folders).
    pub parent_folder: Option<String>,
    /// Access category.
    pub category: Category,
    /// Folder description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Users assigned at creation.
    pub usuarios: Vec<String>,
}

impl NewFolder {
    /// Create a new root folder request in the default category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_folder: None,
            category: Category::default(),
            description: None,
            usuarios: Vec::new(),
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_folder = Some(parent_id.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the assigned users.
    pub fn with_users(mut self, users: Vec<String>) -> Self {
        self.usuarios = users;
        self
    }
}

/// Builder for updating a folder. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` moves the folder to the top level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder: Option<Option<String>>,
}

impl FolderUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the parent folder.
    pub fn parent_folder(mut self, parent_id: Option<String>) -> Self {
        self.parent_folder = Some(parent_id);
        self
    }

    /// Whether nothing would be changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent_folder.is_none()
    }
}
