//! Password digests (Argon2id, PHC string format).
//!
//! Hashing is CPU bound, so the async entry points run it on the blocking pool.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl PasswordHasher {
    /// Custom cost; `memory_kib` >= 8, `iterations` >= 1, `parallelism` >= 1.
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(PasswordError::Params)?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash_blocking(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?
            .to_string();

        Ok(digest)
    }

    /// A malformed stored digest verifies as `false`.
    pub fn verify_blocking(&self, digest: &str, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password)).await?
    }

    pub async fn verify(&self, digest: &str, password: &str) -> Result<bool, PasswordError> {
        let hasher = self.clone();
        let digest = digest.to_string();
        let password = password.to_string();
        Ok(tokio::task::spawn_blocking(move || hasher.verify_blocking(&digest, &password)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::with_cost(8, 1, 1).unwrap()
    }

    #[test]
    fn digest_verifies_only_the_original_password() {
        let hasher = cheap();
        let digest = hasher.hash_blocking("12345678").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify_blocking(&digest, "12345678"));
        assert!(!hasher.verify_blocking(&digest, "12345679"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = cheap();
        assert_ne!(
            hasher.hash_blocking("same").unwrap(),
            hasher.hash_blocking("same").unwrap()
        );
    }

    #[test]
    fn malformed_digest_never_verifies() {
        assert!(!cheap().verify_blocking("plain-text", "plain-text"));
    }

    #[test]
    fn rejects_impossible_cost() {
        assert!(matches!(
            PasswordHasher::with_cost(0, 0, 0),
            Err(PasswordError::Params(_))
        ));
    }

    #[tokio::test]
    async fn async_wrappers_agree_with_blocking_versions() {
        let hasher = cheap();
        let digest = hasher.hash("hunter22").await.unwrap();
        assert!(hasher.verify(&digest, "hunter22").await.unwrap());
        assert!(!hasher.verify(&digest, "hunter23").await.unwrap());
    }
}
