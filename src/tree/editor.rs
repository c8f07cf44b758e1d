//! Editing an existing folder's nested subfolders.
//!
//! Each edit is checked against the local tree, sent to the backend, and
//! applied locally only once the backend accepted it.

use tracing::{debug, info, warn};

use crate::model::{Category, Folder, FolderUpdate};
use crate::validation::validate_folder_name;
use crate::{DocdeskError, Result};

use super::draft::{FolderNode, FolderTree};
use super::hierarchy::find_in_hierarchy;
use super::path::TreePath;
use super::FolderStore;

pub struct NestedFolderEditor<S> {
    store: S,
    folder: Folder,
    tree: FolderTree,
}

impl<S: FolderStore> NestedFolderEditor<S> {
    /// Load the subtree of `folder`.
    ///
    /// Uses the hierarchy endpoint when it knows the folder, then the
    /// folder's direct subfolders, then an empty tree.
    pub async fn load(store: S, folder: Folder) -> Self {
        let category = folder.category_or_default();
        let from_hierarchy = match store.hierarchy().await {
            Ok(roots) => find_in_hierarchy(&roots, &folder.id)
                .map(|found| FolderTree::from_folders(&found.subcarpetas, category)),
            Err(e) => {
                warn!(folder_id = %folder.id, error = %e, "Hierarchy unavailable");
                None
            }
        };
        let tree = match from_hierarchy {
            Some(tree) => tree,
            None => match store.subfolders(&folder.id).await {
                Ok(subs) => FolderTree::from_folders(&subs, category),
                Err(e) => {
                    warn!(folder_id = %folder.id, error = %e, "Failed to load subfolders");
                    FolderTree::new()
                }
            },
        };
        debug!(folder_id = %folder.id, subfolders = tree.count_total(), "Folder loaded for editing");
        Self {
            store,
            folder,
            tree,
        }
    }

    /// Start from an already loaded tree.
    pub fn with_tree(store: S, folder: Folder, tree: FolderTree) -> Self {
        Self {
            store,
            folder,
            tree,
        }
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    pub fn into_tree(self) -> FolderTree {
        self.tree
    }

    fn category(&self) -> Category {
        self.folder.category_or_default()
    }

    fn id_at(&self, path: &TreePath) -> Result<String> {
        if path.is_root() {
            return Ok(self.folder.id.clone());
        }
        self.tree
            .node(path)
            .and_then(|n| n.id.clone())
            .ok_or_else(|| DocdeskError::NotFound(format!("subfolder at path \"{path}\"")))
    }

    /// Create a subfolder under `parent` (the root path is the folder itself).
    pub async fn add_subfolder(&mut self, parent: &TreePath, name: &str) -> Result<TreePath> {
        let name = self.tree.check_insert(parent, name)?;
        let parent_id = self.id_at(parent)?;
        let created = self
            .store
            .add_subfolder(&parent_id, &name, self.category())
            .await?;
        let node = FolderNode::new(name, self.category()).with_id(created.id);
        self.tree.insert(parent, node)
    }

    /// Rename the subfolder at `path`.
    pub async fn rename(&mut self, path: &TreePath, name: &str) -> Result<()> {
        let name = self.tree.check_rename(path, name)?;
        let id = self.id_at(path)?;
        self.store
            .update_folder(&id, &FolderUpdate::new().name(name.clone()))
            .await?;
        self.tree.rename(path, &name)
    }

    /// Delete the subfolder at `path` with everything below it.
    ///
    /// Nodes without a server id are only removed locally.
    pub async fn remove(&mut self, path: &TreePath) -> Result<FolderNode> {
        let node = self
            .tree
            .node(path)
            .ok_or_else(|| DocdeskError::NotFound(format!("subfolder at path \"{path}\"")))?;
        if let Some(id) = node.id.clone() {
            self.store.delete_folder(&id).await?;
        }
        self.tree.remove(path)
    }

    /// Update the edited folder's own name and description.
    pub async fn save(&mut self, name: &str, description: &str) -> Result<()> {
        let name = validate_folder_name(name)?;
        self.store
            .update_folder(
                &self.folder.id,
                &FolderUpdate::new()
                    .name(name.clone())
                    .description(description.to_string()),
            )
            .await?;
        info!(folder_id = %self.folder.id, name = %name, "Folder saved");
        self.folder.name = name;
        self.folder.description = Some(description.to_string());
        Ok(())
    }
}
