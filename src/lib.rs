//! docdesk - document desk client
//!
//! Client library and command-line console for a document-management
//! backend: users, folders with nested subfolders, files and session groups.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod tree;
pub mod validation;

pub use api::{ApiClient, AuthService, FileService, FolderService, GroupService, UploadRequest};
pub use config::Config;
pub use error::{DocdeskError, Result};
pub use model::{Category, FileEntry, Folder, Group, Role, User};
pub use session::SessionStore;
pub use tree::{DeletionMode, DeletionPlan, FolderDraft, FolderStore, NestedFolderEditor, TreePath};
pub use validation::ValidationError;
