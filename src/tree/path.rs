//! Index paths into nested sibling lists.

use std::fmt;
use std::str::FromStr;

use crate::DocdeskError;

/// Address of a node in a folder tree, as sibling indices from the top level.
///
/// Written `"2-0-1"`: third top-level folder, its first child, that child's
/// second child. The empty path is the root level itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath(Vec<usize>);

impl TreePath {
    /// The root level.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The path of the containing node; `None` for the root.
    pub fn parent(&self) -> Option<TreePath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Index of the node among its siblings.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Whether `other` lies strictly below this node.
    pub fn is_ancestor_of(&self, other: &TreePath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> TreePath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("-"))
    }
}

impl FromStr for TreePath {
    type Err = DocdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('-')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| DocdeskError::InvalidPath(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
