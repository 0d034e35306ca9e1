//! Permission set repository for entity-scoped grants

use std::collections::HashMap;

use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::{PermissionDocument, PermissionSetRecord};

/// Postgres unique-violation error code
const UNIQUE_VIOLATION: &str = "23505";

/// True when a store error is a unique-constraint collision, which the
/// service maps to a duplicate-name outcome.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Repository over the `entity_permissions` table.
#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch an entity's active permission sets, keyed by permission id.
    /// `name` narrows the result to a single named set.
    pub async fn fetch_entity_permissions(
        &self,
        entity_id: &str,
        name: Option<&str>,
    ) -> Result<HashMap<String, PermissionSetRecord>, sqlx::Error> {
        let rows = match name {
            Some(name) => {
                sqlx::query(
                    r#"
                    SELECT permission_id, permission_name, permission_json
                    FROM entity_permissions
                    WHERE entity_id = $1 AND active = true AND permission_name = $2
                    "#,
                )
                .bind(entity_id)
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT permission_id, permission_name, permission_json
                    FROM entity_permissions
                    WHERE entity_id = $1 AND active = true
                    "#,
                )
                .bind(entity_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut sets = HashMap::new();
        for row in rows {
            let permission_id: String = row.get("permission_id");
            let document: sqlx::types::Json<PermissionDocument> =
                row.try_get("permission_json")?;
            sets.insert(
                permission_id.clone(),
                PermissionSetRecord {
                    permission_id,
                    permission_name: row.get("permission_name"),
                    permission_json: document.0,
                },
            );
        }

        Ok(sets)
    }

    /// Insert a new permission set. The `(entity_id, permission_name)`
    /// unique constraint surfaces duplicates as a database error the caller
    /// inspects with [`is_unique_violation`].
    pub async fn create_entity_permission(
        &self,
        entity_id: &str,
        permission_id: &str,
        permission_name: &str,
        document: &PermissionDocument,
        actor_id: &str,
    ) -> Result<(), sqlx::Error> {
        info!(
            "Creating permission set '{}' for entity {}",
            permission_name, entity_id
        );

        sqlx::query(
            r#"
            INSERT INTO entity_permissions
                (entity_id, permission_id, permission_name, permission_json,
                 created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(entity_id)
        .bind(permission_id)
        .bind(permission_name)
        .bind(sqlx::types::Json(document))
        .bind(actor_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
