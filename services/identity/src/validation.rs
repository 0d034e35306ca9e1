//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate an entity identifier: exactly 12 alphanumeric characters
pub fn validate_entity_id(entity_id: &str) -> Result<(), String> {
    if entity_id.len() != 12 || !entity_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Entity id must be exactly 12 alphanumeric characters".to_string());
    }

    Ok(())
}

/// Validate a user display name
pub fn validate_user_name(user_name: &str) -> Result<(), String> {
    if user_name.trim().is_empty() {
        return Err("User name is required".to_string());
    }

    if user_name.len() > 128 {
        return Err("User name must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a user code: 1 to 10 characters
pub fn validate_user_code(user_code: &str) -> Result<(), String> {
    if user_code.is_empty() || user_code.len() > 10 {
        return Err("User code must be between 1 and 10 characters long".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("user@no-tld").is_err());
    }

    #[test]
    fn test_validate_entity_id() {
        assert!(validate_entity_id("ABCDEF123456").is_ok());
        assert!(validate_entity_id("short").is_err());
        assert!(validate_entity_id("ABCDEF1234567").is_err());
        assert!(validate_entity_id("ABCDEF12345!").is_err());
    }

    #[test]
    fn test_validate_user_name() {
        assert!(validate_user_name("Jane Doe").is_ok());
        assert!(validate_user_name("   ").is_err());
        assert!(validate_user_name(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_user_code() {
        assert!(validate_user_code("T-01").is_ok());
        assert!(validate_user_code("").is_err());
        assert!(validate_user_code("01234567890").is_err());
    }
}
