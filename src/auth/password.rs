//! # Password hashing and verification (Argon2id)
//!
//! [`CredentialHasher::hash`] generates a random salt via [`OsRng`], hashes the
//! plaintext with the default Argon2id parameters and returns a PHC-format
//! string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`). That string is what the
//! `password_hash` column of the `users` table holds.
//!
//! [`CredentialHasher::verify`] parses a PHC string and checks the plaintext
//! against it. A malformed record is treated exactly like a wrong password so
//! callers never learn which part of a login attempt was bad.

use crate::types::{AppError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// One-way password hasher backed by Argon2id.
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a password against a PHC-format hash.
    ///
    /// Returns `false` for a mismatch and for a record that cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
