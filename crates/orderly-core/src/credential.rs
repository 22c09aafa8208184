//! # Credential Hashing Seam
//!
//! Validation decides *whether* a credential change is well-formed. Turning
//! the secret into a stored hash is someone else's job: the caller injects a
//! [`CredentialHasher`] and the core calls it once, after everything else
//! has passed.
//!
//! The core ships no real implementation. The `orderly` binary provides an
//! Argon2 one.

use crate::error::CredentialError;

/// Derives a storable credential hash from a raw secret.
pub trait CredentialHasher {
    fn hash(&self, secret: &str) -> Result<String, CredentialError>;
}

impl<F> CredentialHasher for F
where
    F: Fn(&str) -> Result<String, CredentialError>,
{
    fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        self(secret)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Deterministic stand-in so tests never touch a real primitive.
    pub(crate) struct ReversingHasher;

    impl CredentialHasher for ReversingHasher {
        fn hash(&self, secret: &str) -> Result<String, CredentialError> {
            Ok(format!("hashed:{}", secret.chars().rev().collect::<String>()))
        }
    }

    pub(crate) struct FailingHasher;

    impl CredentialHasher for FailingHasher {
        fn hash(&self, _secret: &str) -> Result<String, CredentialError> {
            Err(CredentialError::HashFailed("unavailable".to_string()))
        }
    }

    #[test]
    fn test_closures_are_hashers() {
        let hasher = |secret: &str| Ok::<_, CredentialError>(secret.len().to_string());
        assert_eq!(hasher.hash("abc").unwrap(), "3");
    }
}
