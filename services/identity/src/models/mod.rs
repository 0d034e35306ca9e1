//! Identity service models

pub mod auth;
pub mod permission;
pub mod user;

// Re-export for convenience
pub use auth::{ChangePassword, LoginOutcome, LoginQuery};
pub use permission::{
    CreatePermissionSet, GetEntityPermissions, LeafPermissions, PermissionDocument,
    PermissionSetRecord,
};
pub use user::{CreateEntityUser, CreateGlobalUser, Identity, UserRole, UserType};
