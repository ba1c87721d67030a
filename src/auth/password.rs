//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use crate::errors::BlackCardError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, BlackCardError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BlackCardError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| BlackCardError::Internal(format!("Password hash failed: {}", e)))
}

/// False for a wrong password; an unparseable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BlackCardError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| BlackCardError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
