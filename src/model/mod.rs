//! Entity types exchanged with the document-management backend.
//!
//! The backend is the source of truth for every entity here. These types are
//! the client's working copy, shaped after the backend's JSON (Mongo-style
//! `_id` keys, Spanish field names where the API uses them).

mod category;
mod file;
mod folder;
mod group;
mod reference;
mod user;

pub use category::Category;
pub use file::{format_size, FileEntry};
pub use folder::{Folder, FolderUpdate, NewFolder};
pub use group::{Group, GroupUpdate, NewGroup};
pub use reference::{HasId, Ref};
pub use user::{filter_users, LoginResult, NewUser, Role, User, UserUpdate};
