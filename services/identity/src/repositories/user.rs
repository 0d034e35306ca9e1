//! User repository: token lookups, permission materialization, and
//! transactional provisioning

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::{PermissionDocument, UserRole};

/// User row resolved from an authentication token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub user_name: String,
    pub is_chief_admin: bool,
    pub user_role: Option<UserRole>,
    pub token_issued_at: Option<DateTime<Utc>>,
}

/// Minimal view of an existing user row, used by provisioning to decide
/// between insert and reactivation.
#[derive(Debug, Clone)]
pub struct ExistingUser {
    pub user_id: String,
    pub active: bool,
}

/// Field set for inserting a platform-wide (chief admin) user.
#[derive(Debug)]
pub struct NewGlobalUser {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub passkey: String,
    pub salt: String,
    pub actor_id: String,
}

/// Field set for reactivating a previously deactivated entity user. The
/// credential row survives deactivation, so no passkey is involved.
#[derive(Debug)]
pub struct ReactivatedEntityUser {
    pub user_id: String,
    pub entity_id: String,
    pub user_name: String,
    pub user_code: Option<String>,
    pub user_role: UserRole,
    pub permission_id: String,
    pub actor_id: String,
}

/// Field set for inserting a fresh entity-scoped user.
#[derive(Debug)]
pub struct NewEntityUser {
    pub user_id: String,
    pub entity_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_code: Option<String>,
    pub user_role: UserRole,
    pub permission_id: String,
    pub passkey: String,
    pub salt: String,
    pub actor_id: String,
}

/// Repository over `user_details` and `user_entity_details`.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve an authentication token to its active user, together with the
    /// entity role needed to derive the user type. Inactive and deleted
    /// users never resolve.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT ud.user_id, ud.user_name, ud.is_chief_admin, ud.token_issued_at,
                   ued.user_role
            FROM user_details ud
            LEFT JOIN user_entity_details ued ON ud.user_id = ued.user_id
            WHERE ud.authentication_token = $1
              AND ud.active = true AND ud.is_deleted = false
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| AuthenticatedUser {
            user_id: row.get("user_id"),
            user_name: row.get("user_name"),
            is_chief_admin: row.get("is_chief_admin"),
            user_role: row
                .get::<Option<String>, _>("user_role")
                .as_deref()
                .and_then(UserRole::from_str),
            token_issued_at: row.get("token_issued_at"),
        }))
    }

    /// Find any user row by email, active or not.
    pub async fn find_by_email(
        &self,
        user_email: &str,
    ) -> Result<Option<ExistingUser>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT user_id, active
            FROM user_details
            WHERE user_email = $1 AND is_deleted = false
            "#,
        )
        .bind(user_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ExistingUser {
            user_id: row.get("user_id"),
            active: row.get("active"),
        }))
    }

    /// Materialize the permission document the user's entity binding points
    /// at. Users without a binding, or bound to an inactive set, have no
    /// grants.
    pub async fn fetch_permission_document(
        &self,
        user_id: &str,
    ) -> Result<Option<PermissionDocument>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT ep.permission_json
            FROM user_entity_details ued
            JOIN entity_permissions ep ON ued.permission_id = ep.permission_id
            WHERE ued.user_id = $1 AND ep.active = true
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let document: sqlx::types::Json<PermissionDocument> =
                    row.try_get("permission_json")?;
                Ok(Some(document.0))
            }
            None => Ok(None),
        }
    }

    /// Insert a chief-admin user row and its credential row atomically.
    pub async fn create_global_user(&self, new: &NewGlobalUser) -> Result<(), sqlx::Error> {
        info!("Creating global user {}", new.user_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_details
                (user_id, user_name, user_email, is_chief_admin, created_by, updated_by)
            VALUES ($1, $2, $3, true, $4, $4)
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.user_name)
        .bind(&new.user_email)
        .bind(&new.actor_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_authentication (user_id, user_passkey, salt)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.passkey)
        .bind(&new.salt)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Insert an entity user: user row, entity binding, and credential row
    /// in one transaction. Nothing persists if any statement fails.
    pub async fn create_entity_user(&self, new: &NewEntityUser) -> Result<(), sqlx::Error> {
        info!("Creating entity user {} in {}", new.user_id, new.entity_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_details
                (user_id, user_name, user_email, user_code, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.user_name)
        .bind(&new.user_email)
        .bind(&new.user_code)
        .bind(&new.actor_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_entity_details
                (entity_id, user_id, user_role, permission_id, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(&new.entity_id)
        .bind(&new.user_id)
        .bind(new.user_role.as_str())
        .bind(&new.permission_id)
        .bind(&new.actor_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_authentication (user_id, user_passkey, salt)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.passkey)
        .bind(&new.salt)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// Reactivate a previously deactivated user: refresh the user row and
    /// replace the entity binding, atomically. A user is bound to exactly
    /// one entity at a time, so the upsert keys on the user alone and
    /// rebinding moves the user to the new entity.
    pub async fn reactivate_entity_user(
        &self,
        new: &ReactivatedEntityUser,
    ) -> Result<(), sqlx::Error> {
        info!(
            "Reactivating entity user {} in {}",
            new.user_id, new.entity_id
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE user_details
            SET user_name = $1, user_code = $2, active = true, is_deleted = false,
                updated_by = $3, updated_at = now()
            WHERE user_id = $4
            "#,
        )
        .bind(&new.user_name)
        .bind(&new.user_code)
        .bind(&new.actor_id)
        .bind(&new.user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_entity_details
                (entity_id, user_id, user_role, permission_id, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET entity_id = EXCLUDED.entity_id,
                user_role = EXCLUDED.user_role,
                permission_id = EXCLUDED.permission_id,
                updated_by = EXCLUDED.updated_by,
                updated_at = now()
            "#,
        )
        .bind(&new.entity_id)
        .bind(&new.user_id)
        .bind(new.user_role.as_str())
        .bind(&new.permission_id)
        .bind(&new.actor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }
}
