//! Authentication request payloads

use serde::{Deserialize, Serialize};

use crate::validation;

/// Query parameters for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub user_email: String,
    pub user_password: String,
}

impl LoginQuery {
    pub fn validate(&self) -> Result<(), String> {
        validation::validate_email(&self.user_email)?;
        if self.user_password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub user_id: String,
    pub authentication_token: String,
}

/// Request payload for changing a password.
#[derive(Debug, Deserialize)]
pub struct ChangePassword {
    pub user_email: String,
    pub old_password: String,
    pub new_password: String,
}

impl ChangePassword {
    pub fn validate(&self) -> Result<(), String> {
        validation::validate_email(&self.user_email)?;
        if self.old_password.is_empty() || self.new_password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}
