//! REST adapters for the document-management backend.
//!
//! One service per resource, one method per endpoint. Every service borrows
//! the same [`ApiClient`], which carries the device id and bearer token.

mod auth;
mod client;
mod files;
mod folders;
mod groups;

pub use auth::AuthService;
pub use client::{segment, ApiClient, DEVICE_ID_HEADER};
pub use files::{FileService, UploadRequest};
pub use folders::FolderService;
pub use groups::GroupService;
