//! Password hashing and salt generation
//!
//! The passkey is a keyed one-way digest of `password || salt`, stored hex
//! encoded next to a per-user random salt. The salt is base64 rendered for
//! storage.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Generate a fresh per-user salt, base64 rendered.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// Derive the stored passkey for a password and salt.
pub fn derive_passkey(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a candidate password against the stored passkey and salt.
pub fn verify(passkey: &str, salt: &str, candidate: &str) -> bool {
    derive_passkey(candidate, salt) == passkey
}

/// Initial password assigned to provisioned users, derived from the user
/// name. Users are expected to change it on first login.
pub fn default_password(user_name: &str) -> String {
    let stem = user_name
        .split_whitespace()
        .next()
        .unwrap_or("user")
        .to_lowercase();
    format!("{stem}@123")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_passkey_is_deterministic() {
        let salt = generate_salt();
        assert_eq!(
            derive_passkey("hunter2", &salt),
            derive_passkey("hunter2", &salt)
        );
    }

    #[test]
    fn test_verify_accepts_correct_password() {
        let salt = generate_salt();
        let passkey = derive_passkey("s3cret!", &salt);
        assert!(verify(&passkey, &salt, "s3cret!"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let salt = generate_salt();
        let passkey = derive_passkey("s3cret!", &salt);
        assert!(!verify(&passkey, &salt, "guess"));
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_salt_changes_passkey() {
        let a = derive_passkey("same-password", &generate_salt());
        let b = derive_passkey("same-password", &generate_salt());
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_password_uses_first_name() {
        assert_eq!(default_password("Jane Doe"), "jane@123");
        assert_eq!(default_password(""), "user@123");
    }
}
