//! User types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::reference::HasId;
use super::{Category, Folder, Ref};
use crate::{DocdeskError, Result};

/// Minimum concurrent sessions an administrator may grant.
pub const MIN_SESSIONS: u32 = 1;

/// Maximum concurrent sessions an administrator may grant.
pub const MAX_SESSIONS: u32 = 10;

/// Default concurrent session cap for new users.
pub const DEFAULT_MAX_SESSIONS: u32 = 3;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator: manages users, folders and files.
    Admin,
    /// Regular user: browses assigned folders.
    #[default]
    #[serde(alias = "user")]
    Usuario,
}

impl Role {
    /// Wire representation used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Usuario => "usuario",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "usuario" | "user" => Ok(Role::Usuario),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company_name: Option<String>,
    /// Contact person name.
    #[serde(default)]
    pub nombre: Option<String>,
    /// National id number.
    #[serde(default)]
    pub cedula: Option<String>,
    #[serde(default)]
    pub rol: Role,
    /// Folders the user can access.
    #[serde(default)]
    pub folders: Vec<Ref<Folder>>,
    /// Backend-enforced cap on concurrent logins.
    #[serde(default)]
    pub max_sessions: Option<u32>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl HasId for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    /// Whether the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.rol == Role::Admin
    }

    /// Name shown in listings: company name, then contact name, then email.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.nombre.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.email)
    }

    /// Ids of the folders assigned to this user.
    pub fn folder_ids(&self) -> Vec<&str> {
        self.folders.iter().map(|f| f.id()).collect()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
}

/// Data for creating a new user (admin only).
///
/// The backend generates a temporary password and emails it when `password`
/// is left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "company name is required"))]
    pub company_name: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 10, message = "max sessions must be between 1 and 10"))]
    pub max_sessions: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<String>,
}

impl NewUser {
    /// Create a new user request with the required fields.
    pub fn new(email: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            company_name: company_name.into().trim().to_string(),
            ..Self::default()
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the role.
    pub fn with_role(mut self, rol: Role) -> Self {
        self.rol = Some(rol);
        self
    }

    /// Set the session cap.
    pub fn with_max_sessions(mut self, max_sessions: u32) -> Self {
        self.max_sessions = Some(max_sessions);
        self
    }

    /// Validate the form, reporting every failing field.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("invalid value for {field}"))
                    })
                })
                .collect();
            messages.sort();
            DocdeskError::Validation(messages.join("; "))
        })
    }
}

/// Builder for updating a user (admin only). Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sessions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<String>>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing would be changed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the fields that have local rules.
    pub fn check(&self) -> Result<()> {
        if let Some(max) = self.max_sessions {
            if !(MIN_SESSIONS..=MAX_SESSIONS).contains(&max) {
                return Err(DocdeskError::Validation(format!(
                    "max sessions must be between {MIN_SESSIONS} and {MAX_SESSIONS}"
                )));
            }
        }
        if let Some(email) = &self.email {
            if !validator::ValidateEmail::validate_email(email) {
                return Err(DocdeskError::Validation(
                    "a valid email address is required".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Filter users by a search query over company name, contact name and email.
///
/// Matching is case-insensitive; an empty query keeps every user.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let query = query.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            query.is_empty()
                || u.display_name().to_lowercase().contains(&query)
                || u.email.to_lowercase().contains(&query)
        })
        .collect()
}
