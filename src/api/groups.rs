//! Session group endpoints.

use serde_json::Value;
use tracing::info;

use super::client::{extract_entity, extract_list, segment, ApiClient};
use crate::model::{Group, GroupUpdate, NewGroup};
use crate::{DocdeskError, Result};

/// Adapter for `/api/groups/*`.
pub struct GroupService<'a> {
    client: &'a ApiClient,
}

impl<'a> GroupService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        if group.name.trim().is_empty() {
            return Err(DocdeskError::Validation("group name is required".into()));
        }
        let value: Value = self
            .client
            .post("/api/groups/crear", group, "failed to create group")
            .await?;
        let created: Group = extract_entity(value, "group")?;
        info!(group_id = %created.id, name = %created.name, "Group created");
        Ok(created)
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let value: Value = self
            .client
            .get("/api/groups/listar", "failed to list groups")
            .await?;
        extract_list(value, &["groups", "grupos"])
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Group> {
        let value: Value = self
            .client
            .get(
                &format!("/api/groups/{}", segment(group_id)),
                "failed to load group",
            )
            .await?;
        extract_entity(value, "group")
    }

    pub async fn update_group(&self, group_id: &str, update: &GroupUpdate) -> Result<Group> {
        let value: Value = self
            .client
            .put(
                &format!("/api/groups/{}", segment(group_id)),
                update,
                "failed to update group",
            )
            .await?;
        info!(group_id = %group_id, "Group updated");
        extract_entity(value, "group")
    }

    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .delete(
                &format!("/api/groups/{}", segment(group_id)),
                "failed to delete group",
            )
            .await?;
        info!(group_id = %group_id, "Group deleted");
        Ok(())
    }

    /// Add one user to a group.
    pub async fn add_user(&self, group_id: &str, user_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .post_empty(
                &format!(
                    "/api/groups/{}/usuarios/{}",
                    segment(group_id),
                    segment(user_id)
                ),
                "failed to add user to group",
            )
            .await?;
        info!(group_id = %group_id, user_id = %user_id, "User added to group");
        Ok(())
    }

    /// Remove one user from a group.
    pub async fn remove_user(&self, group_id: &str, user_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .delete(
                &format!(
                    "/api/groups/{}/usuarios/{}",
                    segment(group_id),
                    segment(user_id)
                ),
                "failed to remove user from group",
            )
            .await?;
        info!(group_id = %group_id, user_id = %user_id, "User removed from group");
        Ok(())
    }
}
