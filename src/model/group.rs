//! Session groups.
//!
//! Groups bundle users that share a device/session allowance. The backend
//! enforces the limits; the client only edits membership.

use serde::{Deserialize, Serialize};

use super::reference::HasId;
use super::{Ref, User};

/// A session group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub users: Vec<Ref<User>>,
}

impl HasId for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Group {
    /// Ids of the member users.
    pub fn user_ids(&self) -> Vec<&str> {
        self.users.iter().map(|u| u.id()).collect()
    }

    /// Whether the given user belongs to this group.
    pub fn contains(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.id() == user_id)
    }
}

/// Data for creating a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewGroup {
    pub name: String,
    pub users: Vec<String>,
}

/// Builder for updating a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}
