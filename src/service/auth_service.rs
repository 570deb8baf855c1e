//! Authentication: credential checks and session issuance.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;
use utoipa::ToSchema;

use crate::auth::{PasswordHasher, SessionClaims, TokenSigner};
use crate::domain::UserProfile;
use crate::error::SalesError;
use crate::persistence::Store;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginOutcome {
    /// Signed session token.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    /// The authenticated account.
    pub user: UserProfile,
}

/// Checked against when the username is unknown, so that every refused
/// login costs one bcrypt verification.
const DECOY_PASSWORD: &str = "no-such-account";

/// Verifies credentials and issues or validates session tokens.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    hasher: PasswordHasher,
    signer: TokenSigner,
    decoy_hash: OnceCell<String>,
}

impl AuthService {
    /// Creates a new `AuthService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher, signer: TokenSigner) -> Self {
        Self {
            store,
            hasher,
            signer,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Session lifetime in seconds.
    #[must_use]
    pub const fn session_ttl_secs(&self) -> i64 {
        self.signer.ttl_secs()
    }

    /// Checks a username/password pair and issues a session token.
    ///
    /// Unknown user, inactive user and wrong password all fail the same way.
    ///
    /// # Errors
    ///
    /// [`SalesError::MissingFields`] if either value is blank,
    /// [`SalesError::InvalidCredentials`] if the check fails,
    /// [`SalesError::Persistence`] if the store is unavailable.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, SalesError> {
        let mut missing = Vec::new();
        if username.trim().is_empty() {
            missing.push("username".to_string());
        }
        if password.is_empty() {
            missing.push("password".to_string());
        }
        if !missing.is_empty() {
            return Err(SalesError::MissingFields(missing));
        }

        let user = self.store.user_by_username(username).await?;
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.decoy_hash().await?,
        };
        let password_ok = self.hasher.verify(password.to_string(), hash).await?;
        let refusal = match &user {
            None => Some("unknown user"),
            Some(user) if !user.is_active => Some("inactive"),
            Some(_) if !password_ok => Some("wrong password"),
            Some(_) => None,
        };
        let (Some(user), None) = (user, refusal) else {
            tracing::warn!(username, reason = refusal.unwrap_or_default(), "login refused");
            return Err(SalesError::InvalidCredentials);
        };

        let token = self.signer.issue(&user)?;
        tracing::info!(user = %user.id, role = %user.role, "login succeeded");
        Ok(LoginOutcome {
            token,
            expires_in: self.signer.ttl_secs(),
            user: UserProfile::from(&user),
        })
    }

    async fn decoy_hash(&self) -> Result<String, SalesError> {
        self.decoy_hash
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD.to_string()))
            .await
            .cloned()
    }

    /// Validates a session token.
    ///
    /// # Errors
    ///
    /// [`SalesError::InvalidToken`] if it is malformed, tampered with, or
    /// expired.
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, SalesError> {
        self.signer.verify(token)
    }

    /// The current account, read fresh from the store.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] if the account no longer exists or was
    /// deactivated since login.
    pub async fn me(&self, session: &SessionClaims) -> Result<UserProfile, SalesError> {
        match self.store.user_by_id(session.id).await? {
            Some(user) if user.is_active => Ok(UserProfile::from(&user)),
            _ => Err(SalesError::Unauthorized),
        }
    }
}
