pub mod auth;
pub mod authz;
pub mod config;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod password;
pub mod provisioning;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod token;
pub mod validation;

use crate::auth::Authenticator;
use crate::config::AppConfig;
use crate::provisioning::UserProvisioning;
use crate::repositories::{CredentialRepository, PermissionRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub authenticator: Authenticator,
    pub users: UserRepository,
    pub permissions: PermissionRepository,
    pub provisioning: UserProvisioning,
}

impl AppState {
    /// Wire the repositories and services over a connection pool.
    pub fn new(config: AppConfig, pool: sqlx::PgPool) -> Self {
        let users = UserRepository::new(pool.clone());
        let credentials = CredentialRepository::new(pool.clone());
        let permissions = PermissionRepository::new(pool);
        let authenticator = Authenticator::new(users.clone(), credentials, &config);
        let provisioning = UserProvisioning::new(users.clone(), permissions.clone());

        AppState {
            config,
            authenticator,
            users,
            permissions,
            provisioning,
        }
    }
}
