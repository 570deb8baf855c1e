//! bcrypt password hashing.

use crate::config::MIN_BCRYPT_COST;
use crate::error::SalesError;

/// Hashes and verifies passwords with bcrypt.
///
/// bcrypt is deliberately slow, so both operations run on tokio's
/// blocking thread pool and never stall the async workers.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher. Costs below [`MIN_BCRYPT_COST`] are raised to it.
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.max(MIN_BCRYPT_COST),
        }
    }

    /// The effective work factor.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Internal`] if bcrypt fails or the blocking
    /// task is cancelled.
    pub async fn hash(&self, password: String) -> Result<String, SalesError> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| SalesError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| SalesError::Internal(format!("password hashing failed: {e}")))
    }

    /// Checks a plaintext password against a stored hash.
    ///
    /// A malformed stored hash never matches.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Internal`] if the blocking task is cancelled.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, SalesError> {
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| SalesError::Internal(format!("verification task failed: {e}")))?;
        match outcome {
            Ok(matched) => Ok(matched),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is unreadable");
                Ok(false)
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(MIN_BCRYPT_COST)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn cost_is_clamped() {
        assert_eq!(PasswordHasher::new(4).cost(), MIN_BCRYPT_COST);
        assert_eq!(PasswordHasher::new(12).cost(), 12);
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = PasswordHasher::default();
        let Ok(hash) = hasher.hash("correct horse".into()).await else {
            panic!("hashing failed");
        };
        assert!(hash.starts_with("$2"));
        assert!(!hash.contains("correct horse"));
        assert!(matches!(
            hasher.verify("correct horse".into(), hash.clone()).await,
            Ok(true)
        ));
        assert!(matches!(
            hasher.verify("battery staple".into(), hash).await,
            Ok(false)
        ));
    }

    #[tokio::test]
    async fn garbage_hash_never_matches() {
        let hasher = PasswordHasher::default();
        assert!(matches!(
            hasher.verify("x".into(), "not-a-hash".into()).await,
            Ok(false)
        ));
    }
}
