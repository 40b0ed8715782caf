//! Identity configuration
//!
//! Built by the binary from its config file and handed to
//! [`IdentityService`](crate::IdentityService) at construction.

use chrono::Duration;
use std::fmt;
use warden_auth::password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM};

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 3600;

/// Secrets and work factors used by the identity flows
#[derive(Clone)]
pub struct IdentityConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,
    /// Argon2 iteration count
    pub hash_iterations: u32,
    /// Argon2 lane count
    pub hash_parallelism: u32,
}

impl IdentityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            hash_memory_kib: DEFAULT_MEMORY_KIB,
            hash_iterations: DEFAULT_ITERATIONS,
            hash_parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .field("hash_parallelism", &self.hash_parallelism)
            .finish()
    }
}
