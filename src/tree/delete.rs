//! Deleting a folder that has subfolders.
//!
//! The caller picks a [`DeletionMode`], the plan is validated against the
//! folder's subtree, and only then are the DELETE calls issued.

use std::fmt;

use tracing::{debug, info, warn};

use crate::model::Folder;
use crate::{DocdeskError, Result};

use super::draft::FlatFolder;
use super::hierarchy::{find_in_hierarchy, flatten_subfolders};
use super::FolderStore;

/// What to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionMode {
    /// The folder itself; the backend removes every descendant.
    All,
    /// Only these subfolders, in this order.
    Selected(Vec<String>),
    /// Only the folder record.
    ParentOnly,
}

impl DeletionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionMode::All => "all",
            DeletionMode::Selected(_) => "selected",
            DeletionMode::ParentOnly => "parent",
        }
    }
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an executed plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub mode: DeletionMode,
    /// Ids deleted, in call order.
    pub deleted: Vec<String>,
}

impl DeletionOutcome {
    pub fn count(&self) -> usize {
        self.deleted.len()
    }
}

/// A validated deletion for one folder.
#[derive(Debug, Clone)]
pub struct DeletionPlan {
    folder_id: String,
    folder_name: String,
    mode: DeletionMode,
    candidates: Vec<FlatFolder>,
}

impl DeletionPlan {
    /// Validate `mode` against `folder` and its populated `subcarpetas`.
    ///
    /// A selection is reduced to distinct ids with no selected ancestor.
    pub fn new(folder: &Folder, mode: DeletionMode) -> Result<Self> {
        let candidates = flatten_subfolders(&folder.subcarpetas);
        let mode = match mode {
            DeletionMode::Selected(ids) => {
                DeletionMode::Selected(reduce_selection(folder, &candidates, ids)?)
            }
            other => other,
        };
        Ok(Self {
            folder_id: folder.id.clone(),
            folder_name: folder.name.clone(),
            mode,
            candidates,
        })
    }

    pub fn mode(&self) -> &DeletionMode {
        &self.mode
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Every subfolder of the folder, flattened with level and path.
    pub fn candidates(&self) -> &[FlatFolder] {
        &self.candidates
    }

    /// Ids the plan will delete, in order.
    pub fn targets(&self) -> Vec<String> {
        match &self.mode {
            DeletionMode::All | DeletionMode::ParentOnly => vec![self.folder_id.clone()],
            DeletionMode::Selected(ids) => ids.clone(),
        }
    }

    /// Issue the DELETE calls one at a time, stopping at the first failure.
    pub async fn execute<S: FolderStore>(self, store: &S) -> Result<DeletionOutcome> {
        let mut deleted = Vec::new();
        for id in self.targets() {
            if let Err(e) = store.delete_folder(&id).await {
                warn!(
                    folder = %self.folder_name,
                    folder_id = %id,
                    mode = %self.mode,
                    deleted = deleted.len(),
                    error = %e,
                    "Deletion stopped"
                );
                return Err(e);
            }
            deleted.push(id);
        }
        info!(
            folder = %self.folder_name,
            mode = %self.mode,
            count = deleted.len(),
            "Deletion complete"
        );
        Ok(DeletionOutcome {
            mode: self.mode,
            deleted,
        })
    }
}

fn reduce_selection(
    folder: &Folder,
    candidates: &[FlatFolder],
    ids: Vec<String>,
) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Err(DocdeskError::Validation(
            "select at least one subfolder to delete".to_string(),
        ));
    }
    let mut selected: Vec<&FlatFolder> = Vec::new();
    for id in &ids {
        let candidate = candidates
            .iter()
            .find(|c| c.id.as_deref() == Some(id.as_str()))
            .ok_or_else(|| {
                DocdeskError::NotFound(format!("subfolder {id} in folder \"{}\"", folder.name))
            })?;
        if !selected.iter().any(|s| s.id == candidate.id) {
            selected.push(candidate);
        }
    }
    let kept: Vec<String> = selected
        .iter()
        .filter(|c| !selected.iter().any(|s| s.path.is_ancestor_of(&c.path)))
        .filter_map(|c| c.id.clone())
        .collect();
    if kept.len() < ids.len() {
        debug!(
            folder = %folder.name,
            requested = ids.len(),
            kept = kept.len(),
            "Dropped repeated or nested subfolders from selection"
        );
    }
    Ok(kept)
}

/// Plan for a folder without subfolders: delete the folder record.
pub fn plan_for_leaf(folder: &Folder) -> DeletionPlan {
    DeletionPlan {
        folder_id: folder.id.clone(),
        folder_name: folder.name.clone(),
        mode: DeletionMode::ParentOnly,
        candidates: Vec::new(),
    }
}

/// Load `folder` with its full subtree from the hierarchy endpoint.
///
/// When the hierarchy is unavailable or does not contain the folder, the
/// result has no subfolders.
pub async fn load_subtree<S: FolderStore>(store: &S, folder: &Folder) -> Folder {
    match store.hierarchy().await {
        Ok(roots) => match find_in_hierarchy(&roots, &folder.id) {
            Some(found) => found.clone(),
            None => Folder {
                subcarpetas: Vec::new(),
                ..folder.clone()
            },
        },
        Err(e) => {
            warn!(folder_id = %folder.id, error = %e, "Failed to load folder hierarchy");
            Folder {
                subcarpetas: Vec::new(),
                ..folder.clone()
            }
        }
    }
}

/// Add `id` to the selection, or remove it if already selected.
pub fn toggle_selection(selected: &mut Vec<String>, id: &str) {
    if let Some(pos) = selected.iter().position(|s| s == id) {
        selected.remove(pos);
    } else {
        selected.push(id.to_string());
    }
}

/// Select every candidate, or clear the selection if all are selected.
pub fn toggle_all(selected: &mut Vec<String>, candidates: &[FlatFolder]) {
    if selected.len() == candidates.len() {
        selected.clear();
    } else {
        *selected = candidates.iter().filter_map(|c| c.id.clone()).collect();
    }
}
