//! Folder trees: navigation helpers, nested creation and editing, deletion.
//!
//! Everything here works against [`FolderStore`], so the logic can run over
//! the HTTP-backed [`crate::api::FolderService`] or an in-memory fake.

pub mod creator;
pub mod delete;
pub mod draft;
pub mod editor;
pub mod hierarchy;
pub mod path;
pub mod render;

use std::future::Future;

use crate::model::{Category, Folder, FolderUpdate, NewFolder};
use crate::Result;

pub use creator::{update_with_subfolders, CreatedTree, FolderDraft, SubfolderSync};
pub use delete::{
    load_subtree, plan_for_leaf, toggle_all, toggle_selection, DeletionMode, DeletionOutcome,
    DeletionPlan,
};
pub use draft::{is_duplicate_name, FlatFolder, FolderNode, FolderTree};
pub use editor::NestedFolderEditor;
pub use hierarchy::{
    count_total_subfolders, direct_subfolders, find_in_hierarchy, flatten_subfolders,
    main_folders, total_files_concurrently, with_total_files, FolderWithTotals,
};
pub use path::TreePath;
pub use render::render_tree;

/// Folder operations the tree workflows need from the backend.
pub trait FolderStore {
    fn create_folder(&self, folder: &NewFolder) -> impl Future<Output = Result<Folder>> + Send;

    fn update_folder(
        &self,
        folder_id: &str,
        update: &FolderUpdate,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete_folder(&self, folder_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn add_subfolder(
        &self,
        parent_id: &str,
        name: &str,
        category: Category,
    ) -> impl Future<Output = Result<Folder>> + Send;

    /// Root folders with `subcarpetas` populated recursively.
    fn hierarchy(&self) -> impl Future<Output = Result<Vec<Folder>>> + Send;

    fn subfolders(&self, folder_id: &str) -> impl Future<Output = Result<Vec<Folder>>> + Send;
}
