//! Argon2 password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use std::sync::LazyLock;

use crate::server::error::internal::InternalError;

/// Hashes a password into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, InternalError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| InternalError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string.
///
/// Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Stand-in hash checked when no account matches a login.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-account-placeholder").ok());

/// Runs one Argon2 verification that never succeeds.
///
/// Login calls this for unknown emails so they take as long as a wrong password.
pub fn verify_unknown_account(password: &str) -> bool {
    if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
        verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_original_password() {
        let hash = hash_password("tatami2025").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("tatami2025", &hash));
        assert!(!verify_password("tatami2024", &hash));
    }

    #[test]
    fn salts_every_hash() {
        let first = hash_password("tatami2025").unwrap();
        let second = hash_password("tatami2025").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn rejects_malformed_hash() {
        assert!(!verify_password("anything", "!unusable"));
    }

    #[test]
    fn unknown_account_check_hashes_but_never_verifies() {
        assert!(UNKNOWN_ACCOUNT_HASH
            .as_deref()
            .is_some_and(|hash| hash.starts_with("$argon2")));
        assert!(!verify_unknown_account("unknown-account-placeholder"));
        assert!(!verify_unknown_account("tatami2025"));
    }
}
