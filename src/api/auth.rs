//! Authentication and user administration endpoints.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::client::{extract_entity, extract_list, segment, ApiClient};
use crate::model::{LoginResult, NewUser, User, UserUpdate};
use crate::session::SessionStore;
use crate::validation::validate_password_change;
use crate::Result;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(flatten)]
    user: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordResponse {
    #[serde(default)]
    new_password: Option<String>,
}

/// Adapter for `/api/users/*`.
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and record the session.
    ///
    /// The device id travels both as header and in the body; the backend
    /// refuses the login when the user's session limit is reached.
    pub async fn login(
        &self,
        store: &mut SessionStore,
        email: &str,
        password: &str,
    ) -> Result<LoginResult> {
        info!(email = %email, base_url = %self.client.base_url(), "Logging in");
        let body = json!({
            "email": email.trim(),
            "password": password,
            "deviceId": self.client.device_id(),
        });
        let response: LoginResponse = self
            .client
            .post("/api/users/login", &body, "login failed")
            .await?;

        store.set_login(response.user.clone(), response.token.clone())?;
        info!(user_id = %response.user.id, rol = %response.user.rol, "Login succeeded");

        Ok(LoginResult {
            user: response.user,
            token: response.token,
        })
    }

    /// Close the current device session.
    ///
    /// A backend failure is only logged; the local session is cleared either way.
    pub async fn logout(&self, store: &mut SessionStore) -> Result<()> {
        let body = json!({ "deviceId": self.client.device_id() });
        match self
            .client
            .post::<_, Value>("/api/users/cerrar-sesion-actual", &body, "logout failed")
            .await
        {
            Ok(_) => info!("Session closed on the backend"),
            Err(e) => warn!(error = %e, "Failed to close session on the backend"),
        }
        store.clear_all()?;
        info!("Logout completed");
        Ok(())
    }

    /// Profile of the logged-in user.
    pub async fn profile(&self) -> Result<User> {
        self.client
            .get("/api/users/perfil", "failed to load profile")
            .await
    }

    /// List every user (admin only).
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let value: Value = self
            .client
            .get("/api/users/listar", "failed to list users")
            .await?;
        extract_list(value, &["users", "usuarios"])
    }

    /// Create a user (admin only).
    ///
    /// The backend grants the new user every folder of its category and
    /// emails temporary credentials.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        new_user.check()?;
        let value: Value = self
            .client
            .post("/api/users/registro", new_user, "failed to create user")
            .await?;
        let user: User = extract_entity(value, "user")?;
        info!(user_id = %user.id, email = %user.email, "User created");
        Ok(user)
    }

    /// Get one user (admin only).
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let value: Value = self
            .client
            .get(
                &format!("/api/users/{}", segment(user_id)),
                "failed to load user",
            )
            .await?;
        extract_entity(value, "user")
    }

    /// Update a user (admin only).
    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User> {
        update.check()?;
        let value: Value = self
            .client
            .put(
                &format!("/api/users/actualizar/{}", segment(user_id)),
                update,
                "failed to update user",
            )
            .await?;
        info!(user_id = %user_id, "User updated");
        extract_entity(value, "user")
    }

    /// Delete a user (admin only).
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .delete(
                &format!("/api/users/eliminar/{}", segment(user_id)),
                "failed to delete user",
            )
            .await?;
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Reset another user's password (admin only).
    ///
    /// Without `new_password` the backend generates a temporary one, which is
    /// returned when the backend reports it.
    pub async fn reset_user_password(
        &self,
        user_id: &str,
        new_password: Option<&str>,
    ) -> Result<Option<String>> {
        let body = match new_password {
            Some(password) => json!({ "newPassword": password }),
            None => json!({}),
        };
        let response: Option<ResetPasswordResponse> = self
            .client
            .post(
                &format!("/api/users/reset-password/{}", segment(user_id)),
                &body,
                "failed to reset password",
            )
            .await?;
        info!(user_id = %user_id, "Password reset");
        Ok(response.and_then(|r| r.new_password))
    }

    /// Change the logged-in user's password.
    ///
    /// The form is validated locally first. On success every session of the
    /// user is invalidated, so the local session is cleared as well.
    pub async fn change_password(
        &self,
        store: &mut SessionStore,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<()> {
        validate_password_change(current, new, confirm)?;
        let body = json!({ "currentPassword": current, "newPassword": new });
        let _: Value = self
            .client
            .post(
                "/api/users/cambiar-contrasena",
                &body,
                "failed to change password",
            )
            .await?;
        store.clear_all()?;
        info!("Password changed; local session cleared");
        Ok(())
    }
}
