//! File endpoints.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use super::client::{extract_entity, extract_list, segment, ApiClient};
use crate::model::FileEntry;
use crate::validation::{auto_description, stem_name, validate_upload};
use crate::{DocdeskError, Result};

/// A file upload into one folder.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Local file to send.
    pub path: PathBuf,
    /// Display name.
    pub name: String,
    pub description: String,
    /// Target folder id.
    pub folder_id: String,
}

impl UploadRequest {
    /// Build a request with the default name (file stem) and the
    /// extension-based description.
    pub fn new(path: impl Into<PathBuf>, folder_id: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            name: stem_name(&file_name),
            description: auto_description(&file_name),
            path,
            folder_id: folder_id.into(),
        }
    }

    /// Override the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the form fields before reading the file.
    pub fn check(&self) -> Result<()> {
        validate_upload(
            &self.name,
            &self.description,
            &self.folder_id,
            Some(self.path.as_path()).filter(|p| !p.as_os_str().is_empty()),
        )?;
        Ok(())
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string()
    }
}

/// Adapter for `/api/files/*`.
pub struct FileService<'a> {
    client: &'a ApiClient,
}

impl<'a> FileService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the files stored directly in a folder.
    pub async fn list_files(&self, folder_id: &str) -> Result<Vec<FileEntry>> {
        let value: Value = self
            .client
            .get_with_query(
                "/api/files/listar",
                &[("folderId", folder_id)],
                "failed to list files",
            )
            .await?;
        extract_list(value, &["archivos", "files"])
    }

    /// Upload a file as multipart form data.
    ///
    /// The file becomes visible to every user with access to the folder's
    /// category.
    pub async fn upload(&self, request: &UploadRequest) -> Result<FileEntry> {
        request.check()?;
        let bytes = tokio::fs::read(&request.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DocdeskError::NotFound(format!("file {}", request.path.display()))
            } else {
                DocdeskError::Io(e)
            }
        })?;
        let file_name = request.file_name();
        let mime = mime_guess::from_path(&request.path).first_or_octet_stream();
        debug!(
            file = %file_name,
            size = bytes.len(),
            mime = %mime,
            folder_id = %request.folder_id,
            "Uploading file"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .part("file", part)
            .text("name", request.name.trim().to_string())
            .text("description", request.description.trim().to_string())
            .text("folder", request.folder_id.clone());

        let value: Value = self
            .client
            .post_multipart("/api/files/subir", form, "failed to upload file")
            .await?;
        let entry: FileEntry = extract_entity(value, "file")?;
        info!(file_id = %entry.id, file = %file_name, "File uploaded");
        Ok(entry)
    }

    /// Delete a file.
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .delete(
                &format!("/api/files/{}", segment(file_id)),
                "failed to delete file",
            )
            .await?;
        info!(file_id = %file_id, "File deleted");
        Ok(())
    }

    /// Download a file's content.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        self.client
            .get_bytes(
                &format!("/api/files/descargar/{}", segment(file_id)),
                "failed to download file",
            )
            .await
    }

    /// Download a file's content to `dest`, returning the number of bytes written.
    pub async fn download_to(&self, file_id: &str, dest: &Path) -> Result<usize> {
        let bytes = self.download(file_id).await?;
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(dest, &bytes).await?;
        info!(file_id = %file_id, dest = %dest.display(), size = bytes.len(), "File downloaded");
        Ok(bytes.len())
    }

    /// URL that serves the file inline, authenticated by query token.
    ///
    /// No request is made.
    pub fn view_url(&self, file_id: &str) -> String {
        let token = self.client.token().unwrap_or_default();
        format!(
            "{}?token={}",
            self.client
                .url(&format!("/api/files/servir/{}", segment(file_id))),
            urlencoding::encode(token)
        )
    }
}
