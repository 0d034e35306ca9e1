//! User provisioning: entity-scoped and platform-wide user creation
//!
//! Provisioning depends on the permission repository to resolve
//! `permission_name` to a permission id before an entity binding can be
//! written. All multi-row writes are transactional; a failed step leaves
//! no partial user, credential, or binding rows behind.

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::ids;
use crate::models::{CreateEntityUser, CreateGlobalUser};
use crate::password;
use crate::repositories::{
    NewEntityUser, NewGlobalUser, PermissionRepository, ReactivatedEntityUser, UserRepository,
};

#[derive(Clone)]
pub struct UserProvisioning {
    users: UserRepository,
    permissions: PermissionRepository,
}

impl UserProvisioning {
    pub fn new(users: UserRepository, permissions: PermissionRepository) -> Self {
        Self { users, permissions }
    }

    /// Create a chief-admin user with a default password. Returns the new
    /// user id.
    pub async fn create_global_user(
        &self,
        payload: &CreateGlobalUser,
        actor_id: &str,
    ) -> ApiResult<String> {
        let existing = self
            .users
            .find_by_email(&payload.user_email)
            .await
            .map_err(|e| ApiError::store("failed to fetch existing user details", e))?;

        if existing.is_some() {
            return Err(ApiError::ValidationError(
                "User with the provided email already exist".to_string(),
            ));
        }

        let user_id = ids::nano_id(ids::USER_ID_LEN);
        let salt = password::generate_salt();
        let passkey = password::derive_passkey(&password::default_password(&payload.user_name), &salt);

        self.users
            .create_global_user(&NewGlobalUser {
                user_id: user_id.clone(),
                user_name: payload.user_name.clone(),
                user_email: payload.user_email.clone(),
                passkey,
                salt,
                actor_id: actor_id.to_string(),
            })
            .await
            .map_err(|e| ApiError::store("failed to create user", e))?;

        Ok(user_id)
    }

    /// Create or reactivate an entity-scoped user. The permission name must
    /// resolve to an active set for the entity before anything is written.
    /// Returns the user id.
    pub async fn create_entity_user(
        &self,
        payload: &CreateEntityUser,
        actor_id: &str,
    ) -> ApiResult<String> {
        let existing = self
            .users
            .find_by_email(&payload.user_email)
            .await
            .map_err(|e| ApiError::store("failed to fetch existing user details", e))?;

        if existing.as_ref().is_some_and(|user| user.active) {
            return Err(ApiError::ValidationError(
                "User with the provided email already exist".to_string(),
            ));
        }

        let sets = self
            .permissions
            .fetch_entity_permissions(&payload.entity_id, Some(&payload.permission_name))
            .await
            .map_err(|e| ApiError::store("failed to fetch permission details", e))?;

        let permission_id = sets
            .keys()
            .next()
            .cloned()
            .ok_or(ApiError::UnknownPermissionName)?;

        match existing {
            // Deactivated user returning to an entity: reuse the user row
            // and its surviving credential row.
            Some(user) => {
                let new = ReactivatedEntityUser {
                    user_id: user.user_id.clone(),
                    entity_id: payload.entity_id.clone(),
                    user_name: payload.user_name.clone(),
                    user_code: payload.user_code.clone(),
                    user_role: payload.user_role,
                    permission_id,
                    actor_id: actor_id.to_string(),
                };
                self.users
                    .reactivate_entity_user(&new)
                    .await
                    .map_err(|e| ApiError::store("failed to create user", e))?;

                info!("Reactivated user {} in {}", user.user_id, payload.entity_id);
                Ok(user.user_id)
            }
            None => {
                let user_id = ids::nano_id(ids::USER_ID_LEN);
                let salt = password::generate_salt();
                let passkey =
                    password::derive_passkey(&password::default_password(&payload.user_name), &salt);

                let new = NewEntityUser {
                    user_id: user_id.clone(),
                    entity_id: payload.entity_id.clone(),
                    user_name: payload.user_name.clone(),
                    user_email: payload.user_email.clone(),
                    user_code: payload.user_code.clone(),
                    user_role: payload.user_role,
                    permission_id,
                    passkey,
                    salt,
                    actor_id: actor_id.to_string(),
                };
                self.users
                    .create_entity_user(&new)
                    .await
                    .map_err(|e| ApiError::store("failed to create user", e))?;

                Ok(user_id)
            }
        }
    }
}
