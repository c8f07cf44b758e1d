//! Folder endpoints.

use serde_json::{json, Value};
use tracing::{debug, info};

use super::client::{extract_entity, extract_list, segment, ApiClient};
use crate::model::{Category, Folder, FolderUpdate, NewFolder};
use crate::tree::FolderStore;
use crate::Result;

/// Adapter for `/api/folders/*`.
#[derive(Clone, Copy)]
pub struct FolderService<'a> {
    client: &'a ApiClient,
}

impl<'a> FolderService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List every folder visible to the logged-in user, flat.
    ///
    /// Anything other than an array is treated as an empty listing.
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        debug!("Listing folders");
        let value: Value = self
            .client
            .get("/api/folders/listar", "failed to list folders")
            .await?;
        let folders: Vec<Folder> = match value {
            Value::Array(_) => serde_json::from_value(value)?,
            _ => Vec::new(),
        };
        debug!(count = folders.len(), "Folders listed");
        Ok(folders)
    }

    /// Get one folder with its files.
    pub async fn get_folder(&self, folder_id: &str) -> Result<Folder> {
        let value: Value = self
            .client
            .get(
                &format!("/api/folders/{}", segment(folder_id)),
                "failed to load folder",
            )
            .await?;
        extract_entity(value, "folder")
    }

    /// Create a folder (admin only).
    pub async fn create_folder(&self, folder: &NewFolder) -> Result<Folder> {
        let value: Value = self
            .client
            .post("/api/folders/crear", folder, "failed to create folder")
            .await?;
        let created: Folder = extract_entity(value, "folder")?;
        info!(
            folder_id = %created.id,
            name = %created.name,
            parent = ?folder.parent_folder,
            "Folder created"
        );
        Ok(created)
    }

    /// Update a folder (admin only).
    pub async fn update_folder(&self, folder_id: &str, update: &FolderUpdate) -> Result<()> {
        let _: Value = self
            .client
            .put(
                &format!("/api/folders/{}", segment(folder_id)),
                update,
                "failed to update folder",
            )
            .await?;
        info!(folder_id = %folder_id, "Folder updated");
        Ok(())
    }

    /// Delete a folder (admin only). The backend removes its descendants too.
    pub async fn delete_folder(&self, folder_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .delete(
                &format!("/api/folders/{}", segment(folder_id)),
                "failed to delete folder",
            )
            .await?;
        info!(folder_id = %folder_id, "Folder deleted");
        Ok(())
    }

    /// Replace the users assigned to a folder (admin only).
    pub async fn assign_users(&self, folder_id: &str, user_ids: &[String]) -> Result<()> {
        let _: Value = self
            .client
            .put(
                &format!("/api/folders/{}/usuarios", segment(folder_id)),
                &json!({ "usuarios": user_ids }),
                "failed to assign users",
            )
            .await?;
        info!(folder_id = %folder_id, users = user_ids.len(), "Users assigned");
        Ok(())
    }

    /// Root folders with `subcarpetas` populated recursively.
    pub async fn hierarchy(&self) -> Result<Vec<Folder>> {
        let value: Value = self
            .client
            .get("/api/folders/jerarquia", "failed to load folder hierarchy")
            .await?;
        extract_list(value, &["carpetas"])
    }

    /// Direct subfolders of a folder.
    pub async fn subfolders(&self, folder_id: &str) -> Result<Vec<Folder>> {
        let value: Value = self
            .client
            .get(
                &format!("/api/folders/{}/subcarpetas", segment(folder_id)),
                "failed to load subfolders",
            )
            .await?;
        extract_list(value, &["subcarpetas"])
    }

    /// Create a subfolder under `parent_id`.
    pub async fn add_subfolder(
        &self,
        parent_id: &str,
        name: &str,
        category: Category,
    ) -> Result<Folder> {
        let value: Value = self
            .client
            .post(
                &format!("/api/folders/{}/subcarpetas", segment(parent_id)),
                &json!({ "name": name, "category": category }),
                "failed to add subfolder",
            )
            .await?;
        let created: Folder = extract_entity(value, "folder")?;
        info!(parent_id = %parent_id, folder_id = %created.id, name = %name, "Subfolder added");
        Ok(created)
    }

    /// Folders of one category.
    pub async fn by_category(&self, category: Category) -> Result<Vec<Folder>> {
        let value: Value = self
            .client
            .get(
                &format!("/api/folders/categoria/{}", category.as_str()),
                "failed to load folders by category",
            )
            .await?;
        extract_list(value, &["carpetas"])
    }

    /// Seed the backend with sample folders (admin maintenance).
    pub async fn create_test_folders(&self) -> Result<Value> {
        self.client
            .post_empty("/api/folders/crear-prueba", "failed to create test folders")
            .await
    }

    /// Remove every folder (admin maintenance).
    pub async fn clear_all_folders(&self) -> Result<Value> {
        self.client
            .post_empty("/api/folders/limpiar", "failed to clear folders")
            .await
    }

    /// Backend folder diagnostics, returned verbatim.
    pub async fn debug_folders(&self) -> Result<Value> {
        self.client
            .get("/api/folders/debug", "failed to load folder diagnostics")
            .await
    }
}

impl FolderStore for FolderService<'_> {
    async fn create_folder(&self, folder: &NewFolder) -> Result<Folder> {
        FolderService::create_folder(self, folder).await
    }

    async fn update_folder(&self, folder_id: &str, update: &FolderUpdate) -> Result<()> {
        FolderService::update_folder(self, folder_id, update).await
    }

    async fn delete_folder(&self, folder_id: &str) -> Result<()> {
        FolderService::delete_folder(self, folder_id).await
    }

    async fn add_subfolder(&self, parent_id: &str, name: &str, category: Category) -> Result<Folder> {
        FolderService::add_subfolder(self, parent_id, name, category).await
    }

    async fn hierarchy(&self) -> Result<Vec<Folder>> {
        FolderService::hierarchy(self).await
    }

    async fn subfolders(&self, folder_id: &str) -> Result<Vec<Folder>> {
        FolderService::subfolders(self, folder_id).await
    }
}
