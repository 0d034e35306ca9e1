//! Repositories for database operations

pub mod credential;
pub mod permission;
pub mod user;

pub use credential::CredentialRepository;
pub use permission::{PermissionRepository, is_unique_violation};
pub use user::{NewEntityUser, NewGlobalUser, ReactivatedEntityUser, UserRepository};
