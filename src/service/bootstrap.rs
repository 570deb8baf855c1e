//! Startup seeding of the first admin account.

use crate::auth::PasswordHasher;
use crate::domain::{Role, User};
use crate::error::SalesError;
use crate::persistence::Store;

/// Creates an admin account named `username` unless that username exists.
///
/// An existing account is left untouched, whatever its role or password.
/// Returns whether an account was created.
///
/// # Errors
///
/// [`SalesError::Validation`] for a blank username or password,
/// [`SalesError::Persistence`] if the store is unavailable.
pub async fn ensure_admin(
    store: &dyn Store,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<bool, SalesError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(SalesError::Validation(
            "bootstrap admin needs a username and password".to_string(),
        ));
    }
    if store.user_by_username(username).await?.is_some() {
        tracing::debug!(username, "bootstrap admin already present");
        return Ok(false);
    }

    let hash = hasher.hash(password.to_string()).await?;
    let admin = User::new(username.to_string(), hash, Role::Admin);
    match store.insert_user(&admin).await {
        Ok(()) => {
            tracing::info!(user = %admin.id, username, "bootstrap admin created");
            Ok(true)
        }
        // Another instance won the race.
        Err(SalesError::DuplicateUsername(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::service::testkit::Fixture;

    #[tokio::test]
    async fn seeds_once() {
        let fx = Fixture::new();
        let hasher = PasswordHasher::default();
        assert!(matches!(
            ensure_admin(fx.store.as_ref(), &hasher, "root", "pw").await,
            Ok(true)
        ));
        assert!(matches!(
            ensure_admin(fx.store.as_ref(), &hasher, "root", "other").await,
            Ok(false)
        ));

        let Ok(Some(root)) = fx.store.user_by_username("root").await else {
            panic!("admin not stored");
        };
        assert_eq!(root.role, Role::Admin);
        assert!(matches!(
            hasher.verify("pw".into(), root.password_hash).await,
            Ok(true)
        ));
    }

    #[tokio::test]
    async fn blank_credentials_are_refused() {
        let fx = Fixture::new();
        assert!(matches!(
            ensure_admin(fx.store.as_ref(), &PasswordHasher::default(), " ", "pw").await,
            Err(SalesError::Validation(_))
        ));
    }
}
