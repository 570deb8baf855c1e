//! Signed session tokens.
//!
//! Wire format: `base64url(claims JSON) "." base64url(HMAC-SHA256(payload))`,
//! both parts unpadded. The signature covers the encoded payload bytes.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use utoipa::ToSchema;

use crate::domain::{ExhibitionId, Role, User, UserId};
use crate::error::SalesError;

type HmacSha256 = Hmac<Sha256>;

/// Identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    /// User ID.
    pub id: UserId,
    /// Role at login time.
    pub role: Role,
    /// Username at login time.
    pub username: String,
    /// Assigned exhibition at login time.
    pub assigned_exhibition_id: Option<ExhibitionId>,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    /// Succeeds only when the session holds `role`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Unauthorized`] for any other role.
    pub fn require(&self, role: Role) -> Result<(), SalesError> {
        if self.role == role {
            Ok(())
        } else {
            tracing::debug!(user = %self.id, have = %self.role, need = %role, "role gate refused");
            Err(SalesError::Unauthorized)
        }
    }

    /// Whether the session belongs to an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Issues and verifies session tokens with a shared HMAC key.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Creates a signer. A TTL beyond `i64::MAX` seconds is capped.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub const fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issues a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Internal`] if the claims cannot be encoded.
    pub fn issue(&self, user: &User) -> Result<String, SalesError> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token for `user` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Internal`] if the claims cannot be encoded.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, SalesError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            id: user.id,
            role: user.role,
            username: user.username.clone(),
            assigned_exhibition_id: user.assigned_exhibition_id,
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };
        let json = serde_json::to_vec(&claims)
            .map_err(|e| SalesError::Internal(format!("encoding session claims: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(payload.as_bytes())?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verifies a token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::InvalidToken`] if the token is malformed,
    /// tampered with, or expired.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SalesError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::InvalidToken`] if the token is malformed,
    /// tampered with, or expired at `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SalesError> {
        let (payload, signature) = token.split_once('.').ok_or(SalesError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SalesError::InvalidToken)?;
        self.mac(payload.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| SalesError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SalesError::InvalidToken)?;
        let claims: SessionClaims =
            serde_json::from_slice(&json).map_err(|_| SalesError::InvalidToken)?;
        if now.timestamp() >= claims.exp {
            return Err(SalesError::InvalidToken);
        }
        Ok(claims)
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, SalesError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| SalesError::Internal(format!("session key rejected: {e}")))?;
        mac.update(payload);
        Ok(mac)
    }
}
