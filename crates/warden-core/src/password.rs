use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use thiserror::Error;

/// Errors produced while hashing a password.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {reason}")]
    Hash { reason: String },
}

/// Hash a raw password with Argon2id and a fresh random salt, returning
/// the PHC string (`$argon2id$...`) that gets persisted.
pub fn hash_password(raw: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordError::Hash {
            reason: err.to_string(),
        })
}

/// Check a raw password against a stored PHC string. A malformed stored
/// hash is treated as a mismatch rather than an error: login must not
/// leak whether the record or the password was at fault.
pub fn verify_password(raw: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}
