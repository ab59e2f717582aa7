//! Credential Hashing
//! Mission: One-way bcrypt digests for stored passwords

use bcrypt::{hash, verify, BcryptError};
use tracing::warn;

/// bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, BcryptError> {
        hash(plaintext, self.cost)
    }

    /// Compare `plaintext` against a stored digest. Any internal failure counts as a mismatch.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match verify(plaintext, digest) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Password verification failed internally: {}", e);
                false
            }
        }
    }
}
