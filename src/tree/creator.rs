//! Creating a folder together with a tree of nested subfolders.

use tracing::{debug, info};

use crate::model::{Category, Folder, FolderUpdate, NewFolder};
use crate::validation::validate_folder_name;
use crate::{DocdeskError, Result};

use super::draft::{FolderNode, FolderTree};
use super::path::TreePath;
use super::FolderStore;

/// A folder and its subfolders, assembled offline before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderDraft {
    pub name: String,
    pub category: Category,
    /// Generated on submit when `None`.
    pub description: Option<String>,
    /// Parent of the new folder; `None` for a top-level folder.
    pub parent_folder: Option<String>,
    pub tree: FolderTree,
}

/// What [`FolderDraft::submit`] created.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTree {
    pub root: Folder,
    pub subfolders_created: usize,
}

impl FolderDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_folder = Some(parent_id.into());
        self
    }

    /// Add a subfolder under `parent`; it takes the draft's category.
    pub fn add_subfolder(&mut self, parent: &TreePath, name: &str) -> Result<TreePath> {
        self.tree
            .insert(parent, FolderNode::new(name, self.category))
    }

    /// Merge a slash-separated chain such as `"2024/Enero/Facturas"`.
    ///
    /// Segments that already exist are reused; the chain as a whole must add
    /// at least one new folder.
    pub fn add_chain(&mut self, chain: &str) -> Result<TreePath> {
        let segments: Vec<&str> = chain
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return Err(DocdeskError::Validation(
                "subfolder name is required".to_string(),
            ));
        }

        let mut path = TreePath::root();
        let mut added = false;
        for segment in segments {
            let existing = self
                .tree
                .subfolders_at(&path)
                .iter()
                .position(|n| n.name.trim().to_lowercase() == segment.to_lowercase());
            path = match existing {
                Some(index) => path.child(index),
                None => {
                    added = true;
                    self.add_subfolder(&path, segment)?
                }
            };
        }
        if !added {
            return Err(DocdeskError::DuplicateName(chain.trim().to_string()));
        }
        Ok(path)
    }

    /// The description sent when none was given.
    pub fn generated_description(&self) -> String {
        let names: Vec<&str> = self.tree.nodes().iter().map(|n| n.name.as_str()).collect();
        if names.is_empty() {
            format!(
                "This folder stores files related to \"{}\"",
                self.name.trim()
            )
        } else {
            format!(
                "This folder will be created with subfolders: {}",
                names.join(", ")
            )
        }
    }

    /// Create the folder, then every subfolder depth-first, one at a time.
    pub async fn submit<S: FolderStore>(&self, store: &S) -> Result<CreatedTree> {
        let name = validate_folder_name(&self.name)?;
        let description = self
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| self.generated_description());

        let mut request = NewFolder::new(name)
            .with_category(self.category)
            .with_description(description);
        if let Some(parent) = &self.parent_folder {
            request = request.with_parent(parent.clone());
        }
        let root = store.create_folder(&request).await?;

        let mut pending: Vec<(String, &FolderNode)> = self
            .tree
            .nodes()
            .iter()
            .rev()
            .map(|n| (root.id.clone(), n))
            .collect();
        let mut created = 0;
        while let Some((parent_id, node)) = pending.pop() {
            let request = NewFolder::new(node.name.clone())
                .with_category(node.category)
                .with_parent(parent_id.clone());
            let folder = store.create_folder(&request).await?;
            debug!(folder_id = %folder.id, parent_id = %parent_id, name = %node.name, "Subfolder created");
            created += 1;
            pending.extend(
                node.subfolders
                    .iter()
                    .rev()
                    .map(|child| (folder.id.clone(), child)),
            );
        }

        info!(
            folder_id = %root.id,
            name = %root.name,
            subfolders = created,
            "Folder tree created"
        );
        Ok(CreatedTree {
            root,
            subfolders_created: created,
        })
    }
}

/// Changes made by [`update_with_subfolders`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubfolderSync {
    /// Ids of removed subfolders.
    pub deleted: Vec<String>,
    pub created: Vec<Folder>,
}

/// Rename a folder and reconcile its direct subfolders with `names`.
///
/// `current` are the folder's direct subfolders. Those whose name is not in
/// `names` are deleted, then names with no matching subfolder are created.
/// Names match exactly after trimming.
pub async fn update_with_subfolders<S: FolderStore>(
    store: &S,
    folder_id: &str,
    name: &str,
    current: &[Folder],
    names: &[String],
) -> Result<SubfolderSync> {
    let name = validate_folder_name(name)?;
    let wanted: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    let description = if wanted.is_empty() {
        format!("This folder stores files related to \"{name}\"")
    } else {
        format!(
            "This folder will be updated with subfolders: {}",
            wanted.join(", ")
        )
    };
    store
        .update_folder(
            folder_id,
            &FolderUpdate::new().name(name).description(description),
        )
        .await?;

    let mut sync = SubfolderSync::default();
    for sub in current {
        if !wanted.contains(&sub.name.as_str()) {
            store.delete_folder(&sub.id).await?;
            sync.deleted.push(sub.id.clone());
        }
    }
    for wanted_name in &wanted {
        if !current.iter().any(|s| s.name == *wanted_name) {
            let request = NewFolder::new(*wanted_name).with_parent(folder_id);
            sync.created.push(store.create_folder(&request).await?);
        }
    }
    info!(
        folder_id = %folder_id,
        deleted = sync.deleted.len(),
        created = sync.created.len(),
        "Subfolders reconciled"
    );
    Ok(sync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::testing::{folder, Call, MemoryStore};
    use serde_json::json;

    fn p(s: &str) -> TreePath {
        s.parse().unwrap()
    }

    #[test]
    fn test_subfolders_inherit_category() {
        let mut draft = FolderDraft::new("Seguros").with_category(Category::EncargadorSeguros);
        let path = draft.add_subfolder(&TreePath::root(), "Pólizas").unwrap();
        draft.add_subfolder(&path, "2024").unwrap();
        assert_eq!(
            draft.tree.node(&p("0-0")).unwrap().category,
            Category::EncargadorSeguros
        );
    }

    #[test]
    fn test_add_chain_merges_and_rejects_duplicates() {
        let mut draft = FolderDraft::new("Clientes");
        draft.add_chain("2024/Enero").unwrap();
        let path = draft.add_chain("2024/Febrero").unwrap();
        assert_eq!(path.to_string(), "0-1");
        assert_eq!(draft.tree.count_total(), 3);

        let err = draft.add_chain("2024 / enero").unwrap_err();
        assert!(matches!(err, DocdeskError::DuplicateName(_)));
        assert!(draft.add_chain(" / ").is_err());
    }

    #[test]
    fn test_generated_description() {
        let mut draft = FolderDraft::new(" Legal ");
        assert_eq!(
            draft.generated_description(),
            "This folder stores files related to \"Legal\""
        );
        draft.add_chain("Contratos/2024").unwrap();
        draft.add_chain("Poderes").unwrap();
        assert_eq!(
            draft.generated_description(),
            "This folder will be created with subfolders: Contratos, Poderes"
        );
    }

    #[tokio::test]
    async fn test_submit_creates_depth_first() {
        let mut draft = FolderDraft::new("Clientes").with_parent("top");
        draft.add_chain("A/A1").unwrap();
        draft.add_chain("A/A2").unwrap();
        draft.add_chain("B").unwrap();

        let store = MemoryStore::new();
        let created = draft.submit(&store).await.unwrap();
        assert_eq!(created.root.id, "id1");
        assert_eq!(created.subfolders_created, 4);

        let calls = store.calls();
        let expected = [
            ("Clientes", Some("top")),
            ("A", Some("id1")),
            ("A1", Some("id2")),
            ("A2", Some("id2")),
            ("B", Some("id1")),
        ];
        assert_eq!(calls.len(), expected.len());
        for (call, (name, parent)) in calls.iter().zip(expected) {
            assert_eq!(
                call,
                &Call::Create {
                    name: name.to_string(),
                    parent: parent.map(str::to_string),
                }
            );
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_name_without_calls() {
        let store = MemoryStore::new();
        let err = FolderDraft::new("   ").submit(&store).await.unwrap_err();
        assert!(matches!(err, DocdeskError::Validation(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_stops_on_failure() {
        let mut draft = FolderDraft::new("Clientes");
        draft.add_chain("A").unwrap();
        draft.add_chain("B").unwrap();
        let store = MemoryStore::new().fail_on("A");
        assert!(draft.submit(&store).await.is_err());
        assert_eq!(store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_update_with_subfolders() {
        let current = vec![
            folder(json!({ "_id": "s1", "name": "Viejo", "parentFolder": "f" })),
            folder(json!({ "_id": "s2", "name": "Queda", "parentFolder": "f" })),
        ];
        let store = MemoryStore::new();
        let sync = update_with_subfolders(
            &store,
            "f",
            "Clientes",
            &current,
            &["Queda".to_string(), " Nuevo ".to_string(), "".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(sync.deleted, vec!["s1".to_string()]);
        assert_eq!(sync.created.len(), 1);
        assert_eq!(sync.created[0].name, "Nuevo");

        let calls = store.calls();
        assert_eq!(
            calls[0],
            Call::Update {
                id: "f".into(),
                update: FolderUpdate::new()
                    .name("Clientes")
                    .description("This folder will be updated with subfolders: Queda, Nuevo"),
            }
        );
        assert_eq!(calls[1], Call::Delete("s1".into()));
    }
}
