//! User models and the request-scoped identity

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::permission::PermissionDocument;
use crate::validation;

/// Classification of a user across the platform.
///
/// Entity admins are principals; teachers and students are plain users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "chief admin")]
    ChiefAdmin,
    #[serde(rename = "entity admin")]
    EntityAdmin,
    #[serde(rename = "user")]
    User,
}

impl UserType {
    /// Derive the user type from the stored chief-admin flag and the
    /// entity-scoped role, if the user has a binding.
    pub fn from_parts(is_chief_admin: bool, user_role: Option<UserRole>) -> Self {
        if is_chief_admin {
            UserType::ChiefAdmin
        } else if user_role == Some(UserRole::Principal) {
            UserType::EntityAdmin
        } else {
            UserType::User
        }
    }
}

/// Role a user holds within one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Principal,
    Teacher,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Principal => "principal",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "principal" => Some(UserRole::Principal),
            "teacher" => Some(UserRole::Teacher),
            "student" => Some(UserRole::Student),
            _ => None,
        }
    }
}

/// Authenticated caller, reconstructed per request from the token lookup.
///
/// `permissions` maps module name to the caller's permission document and is
/// merged in by the permission guard on demand; token validation returns the
/// identity with it empty.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub user_name: String,
    pub user_type: UserType,
    pub permissions: HashMap<String, PermissionDocument>,
}

impl Identity {
    pub fn new(user_id: String, user_name: String, user_type: UserType) -> Self {
        Self {
            user_id,
            user_name,
            user_type,
            permissions: HashMap::new(),
        }
    }
}

/// Request payload for provisioning an entity-scoped user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntityUser {
    pub entity_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_role: UserRole,
    pub permission_name: String,
    #[serde(default)]
    pub user_code: Option<String>,
}

impl CreateEntityUser {
    pub fn validate(&self) -> Result<(), String> {
        validation::validate_entity_id(&self.entity_id)?;
        validation::validate_user_name(&self.user_name)?;
        validation::validate_email(&self.user_email)?;
        if let Some(code) = &self.user_code {
            validation::validate_user_code(code)?;
        }
        if self.permission_name.is_empty() {
            return Err("permission name is required".to_string());
        }
        Ok(())
    }
}

/// Request payload for provisioning a platform-wide (chief admin) user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGlobalUser {
    pub user_name: String,
    pub user_email: String,
}

impl CreateGlobalUser {
    pub fn validate(&self) -> Result<(), String> {
        validation::validate_user_name(&self.user_name)?;
        validation::validate_email(&self.user_email)
    }
}
