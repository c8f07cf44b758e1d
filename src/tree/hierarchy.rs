//! Helpers over server-side folder trees and flat folder listings.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::FolderService;
use crate::model::Folder;
use crate::Result;

use super::draft::FlatFolder;
use super::path::TreePath;

/// Depth-first search for `id` through `subcarpetas`.
pub fn find_in_hierarchy<'a>(roots: &'a [Folder], id: &str) -> Option<&'a Folder> {
    for folder in roots {
        if folder.id == id {
            return Some(folder);
        }
        if let Some(found) = find_in_hierarchy(&folder.subcarpetas, id) {
            return Some(found);
        }
    }
    None
}

/// Every folder below `folders` (inclusive) in pre-order.
pub fn flatten_subfolders(folders: &[Folder]) -> Vec<FlatFolder> {
    let mut out = Vec::new();
    flatten_into(folders, &TreePath::root(), &mut out);
    out
}

fn flatten_into(folders: &[Folder], parent: &TreePath, out: &mut Vec<FlatFolder>) {
    for (index, folder) in folders.iter().enumerate() {
        let path = parent.child(index);
        out.push(FlatFolder {
            level: parent.depth(),
            path: path.clone(),
            id: Some(folder.id.clone()),
            name: folder.name.clone(),
            child_count: folder.subcarpetas.len(),
        });
        flatten_into(&folder.subcarpetas, &path, out);
    }
}

/// Number of folders in `folders` and below.
pub fn count_total_subfolders(folders: &[Folder]) -> usize {
    folders
        .iter()
        .map(|f| 1 + count_total_subfolders(&f.subcarpetas))
        .sum()
}

/// Folders of a flat listing whose parent is `parent_id`.
pub fn direct_subfolders<'a>(all: &'a [Folder], parent_id: &str) -> Vec<&'a Folder> {
    all.iter()
        .filter(|f| f.parent_id() == Some(parent_id))
        .collect()
}

/// Top-level folders of a flat listing.
pub fn main_folders(all: &[Folder]) -> Vec<&Folder> {
    all.iter().filter(|f| f.is_root()).collect()
}

/// A folder with its file count including direct subfolders.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderWithTotals {
    pub folder: Folder,
    pub subfolder_count: usize,
    /// Own files plus the files of direct subfolders.
    pub total_files: usize,
}

impl FolderWithTotals {
    /// Files held by direct subfolders.
    pub fn subfolder_files(&self) -> usize {
        self.total_files.saturating_sub(self.folder.file_count())
    }
}

/// Totals for every folder of a flat listing, using the `files` each
/// listing entry carries.
pub fn with_total_files(all: &[Folder]) -> Vec<FolderWithTotals> {
    all.iter()
        .map(|folder| {
            let subs = direct_subfolders(all, &folder.id);
            let total_files =
                folder.file_count() + subs.iter().map(|s| s.file_count()).sum::<usize>();
            FolderWithTotals {
                folder: folder.clone(),
                subfolder_count: subs.len(),
                total_files,
            }
        })
        .collect()
}

/// Load the given folders concurrently and total the top-level ones.
///
/// Folders that fail to load are skipped. Each top-level folder's direct
/// subfolders are fetched concurrently as well; if any of those fails the
/// folder falls back to its own file count.
pub async fn total_files_concurrently(
    folders: &FolderService<'_>,
    folder_ids: &[String],
) -> Result<Vec<FolderWithTotals>> {
    let loaded = join_all(folder_ids.iter().map(|id| async move {
        match folders.get_folder(id).await {
            Ok(folder) => Some(folder),
            Err(e) => {
                warn!(folder_id = %id, error = %e, "Failed to load folder");
                None
            }
        }
    }))
    .await;
    let main: Vec<Folder> = loaded
        .into_iter()
        .flatten()
        .filter(|f| f.is_root())
        .collect();
    if main.is_empty() {
        return Ok(Vec::new());
    }

    let listing = folders.list_folders().await?;
    let totals = join_all(main.into_iter().map(|folder| {
        let subs: Vec<String> = direct_subfolders(&listing, &folder.id)
            .into_iter()
            .map(|s| s.id.clone())
            .collect();
        async move {
            let own = folder.file_count();
            let loaded = join_all(subs.iter().map(|id| folders.get_folder(id))).await;
            let total_files = match loaded.into_iter().collect::<Result<Vec<_>>>() {
                Ok(subfolders) => own + subfolders.iter().map(|s| s.file_count()).sum::<usize>(),
                Err(e) => {
                    warn!(folder_id = %folder.id, error = %e, "Failed to total subfolder files");
                    own
                }
            };
            debug!(
                folder = %folder.name,
                own,
                from_subfolders = total_files - own,
                "Folder file total"
            );
            FolderWithTotals {
                subfolder_count: subs.len(),
                total_files,
                folder,
            }
        }
    }))
    .await;
    Ok(totals)
}
