//! Credential repository: passkeys, salts, and token rotation

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

/// Stored credential pair for an active user.
#[derive(Debug, Clone)]
pub struct CredentialRow {
    pub user_id: String,
    pub passkey: String,
    pub salt: String,
}

/// Repository over the `user_authentication` table and the token columns
/// of `user_details`.
#[derive(Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up the credential pair for an active, non-deleted user by email.
    pub async fn fetch_active_by_email(
        &self,
        user_email: &str,
    ) -> Result<Option<CredentialRow>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT ud.user_id, ua.user_passkey, ua.salt
            FROM user_details ud
            JOIN user_authentication ua ON ud.user_id = ua.user_id
            WHERE ud.user_email = $1 AND ud.active = true AND ud.is_deleted = false
            "#,
        )
        .bind(user_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| CredentialRow {
            user_id: row.get("user_id"),
            passkey: row.get("user_passkey"),
            salt: row.get("salt"),
        }))
    }

    /// Persist a freshly issued token on the user row, overwriting any prior
    /// token. Concurrent logins race here; last writer wins.
    pub async fn store_token(
        &self,
        user_id: &str,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE user_details
            SET authentication_token = $1, token_issued_at = $2, updated_at = now()
            WHERE user_id = $3
            "#,
        )
        .bind(token)
        .bind(issued_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace the stored passkey and salt. The old hash stops verifying
    /// immediately; the authentication token is left untouched.
    pub async fn update_passkey(
        &self,
        user_id: &str,
        passkey: &str,
        salt: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE user_authentication
            SET user_passkey = $1, salt = $2
            WHERE user_id = $3
            "#,
        )
        .bind(passkey)
        .bind(salt)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
