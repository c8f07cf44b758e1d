//! In-memory folder tree used while creating or editing nested subfolders.

use crate::model::{Category, Folder};
use crate::{DocdeskError, Result};

use super::path::TreePath;

/// One node of an editable folder tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    /// Backend id; `None` until the folder exists on the server.
    pub id: Option<String>,
    pub name: String,
    pub category: Category,
    pub subfolders: Vec<FolderNode>,
}

impl FolderNode {
    /// A draft node not yet created on the server.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            id: None,
            name: name.into(),
            category,
            subfolders: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_subfolders(mut self, subfolders: Vec<FolderNode>) -> Self {
        self.subfolders = subfolders;
        self
    }

    /// Convert a server folder and its `subcarpetas`, recursively.
    pub fn from_folder(folder: &Folder, default_category: Category) -> Self {
        let category = folder.category.unwrap_or(default_category);
        Self {
            id: Some(folder.id.clone()),
            name: folder.name.clone(),
            category,
            subfolders: folder
                .subcarpetas
                .iter()
                .map(|sub| FolderNode::from_folder(sub, category))
                .collect(),
        }
    }

    /// Number of descendants at every depth.
    pub fn count_descendants(&self) -> usize {
        count_all(&self.subfolders)
    }
}

/// A node listed in pre-order with its depth and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFolder {
    /// Depth, 0 for top-level nodes.
    pub level: usize,
    pub path: TreePath,
    pub id: Option<String>,
    pub name: String,
    /// Number of direct children.
    pub child_count: usize,
}

/// Whether `name` collides with one of `siblings` (trimmed, case-insensitive).
pub fn is_duplicate_name(name: &str, siblings: &[FolderNode]) -> bool {
    let needle = name.trim().to_lowercase();
    siblings
        .iter()
        .any(|s| s.name.trim().to_lowercase() == needle)
}

fn count_all(nodes: &[FolderNode]) -> usize {
    nodes.iter().map(|n| 1 + count_all(&n.subfolders)).sum()
}

fn not_found(path: &TreePath) -> DocdeskError {
    DocdeskError::NotFound(format!("subfolder at path \"{path}\""))
}

fn require_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DocdeskError::Validation(
            "subfolder name is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// The subfolders of one folder, as an editable tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTree {
    nodes: Vec<FolderNode>,
}

impl FolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<FolderNode>) -> Self {
        Self { nodes }
    }

    /// Build from server `subcarpetas`.
    pub fn from_folders(folders: &[Folder], default_category: Category) -> Self {
        Self {
            nodes: folders
                .iter()
                .map(|f| FolderNode::from_folder(f, default_category))
                .collect(),
        }
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[FolderNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `path`; `None` for the root path or an unresolved path.
    pub fn node(&self, path: &TreePath) -> Option<&FolderNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.nodes.get(*first)?;
        for index in rest {
            current = current.subfolders.get(*index)?;
        }
        Some(current)
    }

    pub fn node_mut(&mut self, path: &TreePath) -> Option<&mut FolderNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.nodes.get_mut(*first)?;
        for index in rest {
            current = current.subfolders.get_mut(*index)?;
        }
        Some(current)
    }

    /// Children of the node at `path` (top-level nodes for the root path).
    ///
    /// A path that does not resolve yields an empty slice.
    pub fn subfolders_at(&self, path: &TreePath) -> &[FolderNode] {
        if path.is_root() {
            return &self.nodes;
        }
        self.node(path).map(|n| n.subfolders.as_slice()).unwrap_or(&[])
    }

    fn children_mut(&mut self, path: &TreePath) -> Option<&mut Vec<FolderNode>> {
        if path.is_root() {
            return Some(&mut self.nodes);
        }
        self.node_mut(path).map(|n| &mut n.subfolders)
    }

    /// Check that a subfolder named `name` may be added under `parent`.
    ///
    /// Returns the trimmed name.
    pub fn check_insert(&self, parent: &TreePath, name: &str) -> Result<String> {
        let name = require_name(name)?;
        if !parent.is_root() && self.node(parent).is_none() {
            return Err(not_found(parent));
        }
        if is_duplicate_name(&name, self.subfolders_at(parent)) {
            return Err(DocdeskError::DuplicateName(name));
        }
        Ok(name)
    }

    /// Append `node` under `parent`, returning its path.
    pub fn insert(&mut self, parent: &TreePath, mut node: FolderNode) -> Result<TreePath> {
        node.name = self.check_insert(parent, &node.name)?;
        let siblings = self.children_mut(parent).ok_or_else(|| not_found(parent))?;
        siblings.push(node);
        Ok(parent.child(siblings.len() - 1))
    }

    /// Check that the node at `path` may be renamed to `name`.
    ///
    /// The node's own current name does not count as a duplicate.
    pub fn check_rename(&self, path: &TreePath, name: &str) -> Result<String> {
        let name = require_name(name)?;
        let parent = path.parent().ok_or_else(|| not_found(path))?;
        let index = path.last().ok_or_else(|| not_found(path))?;
        let siblings = self.subfolders_at(&parent);
        if index >= siblings.len() {
            return Err(not_found(path));
        }
        let duplicate = siblings
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name.trim().to_lowercase() == name.to_lowercase());
        if duplicate {
            return Err(DocdeskError::DuplicateName(name));
        }
        Ok(name)
    }

    pub fn rename(&mut self, path: &TreePath, name: &str) -> Result<()> {
        let name = self.check_rename(path, name)?;
        let node = self.node_mut(path).ok_or_else(|| not_found(path))?;
        node.name = name;
        Ok(())
    }

    /// Remove the node at `path` with its whole subtree.
    pub fn remove(&mut self, path: &TreePath) -> Result<FolderNode> {
        let parent = path.parent().ok_or_else(|| not_found(path))?;
        let index = path.last().ok_or_else(|| not_found(path))?;
        let siblings = self.children_mut(&parent).ok_or_else(|| not_found(path))?;
        if index >= siblings.len() {
            return Err(not_found(path));
        }
        Ok(siblings.remove(index))
    }

    /// Number of nodes at every depth.
    pub fn count_total(&self) -> usize {
        count_all(&self.nodes)
    }

    /// Every node in pre-order.
    pub fn flatten(&self) -> Vec<FlatFolder> {
        let mut out = Vec::new();
        flatten_into(&self.nodes, &TreePath::root(), &mut out);
        out
    }
}

fn flatten_into(nodes: &[FolderNode], parent: &TreePath, out: &mut Vec<FlatFolder>) {
    for (index, node) in nodes.iter().enumerate() {
        let path = parent.child(index);
        out.push(FlatFolder {
            level: parent.depth(),
            path: path.clone(),
            id: node.id.clone(),
            name: node.name.clone(),
            child_count: node.subfolders.len(),
        });
        flatten_into(&node.subfolders, &path, out);
    }
}
