//! Password hashing and verification.

use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};

/// Hash a password using scrypt
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt.hash_password(plain.as_bytes(), &salt)?.to_string();
    Ok(hash)
}

/// Verify a password against a stored PHC hash string.
///
/// An unparsable stored hash verifies as false, the caller treats it the
/// same as a wrong password.
#[must_use]
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}
