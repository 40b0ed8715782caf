//! Password hashing

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::AuthError;

/// Default Argon2 memory cost in KiB
pub const DEFAULT_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;
/// Default Argon2 iteration count
pub const DEFAULT_ITERATIONS: u32 = Params::DEFAULT_T_COST;
/// Default Argon2 lane count
pub const DEFAULT_PARALLELISM: u32 = Params::DEFAULT_P_COST;

/// Argon2id hasher with a configurable work factor
///
/// Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
/// so each one carries its own parameters and salt. Verification reads them
/// from the digest, which keeps old digests valid after the work factor is
/// raised.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Create a hasher with the given memory cost (KiB), iteration count and
    /// lane count
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a candidate password against a stored digest
    ///
    /// Returns `false` for a malformed digest. The final output comparison
    /// is constant-time.
    pub fn verify(&self, digest: &str, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum-cost parameters keep the tests fast.
    fn hasher() -> CredentialHasher {
        CredentialHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let digest = hasher.hash("password1").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(!digest.contains("password1"));
        assert!(hasher.verify(&digest, "password1"));
        assert!(!hasher.verify(&digest, "password2"));
    }

    #[test]
    fn test_same_password_different_salt() {
        let hasher = hasher();
        let first = hasher.hash("correct horse").unwrap();
        let second = hasher.hash("correct horse").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&first, "correct horse"));
        assert!(hasher.verify(&second, "correct horse"));
    }

    #[test]
    fn test_malformed_digest_is_false() {
        let hasher = hasher();
        assert!(!hasher.verify("", "password1"));
        assert!(!hasher.verify("not-a-phc-string", "password1"));
        assert!(!hasher.verify("$argon2id$v=19$m=1024,t=1,p=1$$", "password1"));
    }

    #[test]
    fn test_digest_verifies_under_other_work_factor() {
        let digest = hasher().hash("password1").unwrap();
        let stronger = CredentialHasher::new(2048, 2, 1).unwrap();
        assert!(stronger.verify(&digest, "password1"));
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            CredentialHasher::new(1, 1, 1),
            Err(AuthError::HashParams(_))
        ));
    }
}
