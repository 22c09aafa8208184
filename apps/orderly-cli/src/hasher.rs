//! Argon2 credential hashing.
//!
//! The concrete [`CredentialHasher`] injected into user validation. Output is
//! a PHC string (`$argon2id$v=19$...`) carrying its own random salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use orderly_core::{CredentialError, CredentialHasher};

/// Argon2id with the crate's default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CredentialError::HashFailed(e.to_string()))?;

        Ok(hash.to_string())
    }
}
