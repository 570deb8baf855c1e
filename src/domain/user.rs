//! User accounts and roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ExhibitionId, UserId};

/// Access role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full CRUD over exhibitions, products and roster; reads all reports.
    Admin,
    /// Records orders against a live exhibition.
    Salesman,
}

impl Role {
    /// Canonical upper-case name, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Salesman => "SALESMAN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "SALESMAN" => Ok(Self::Salesman),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A stored user account.
///
/// Accounts are never deleted; `is_active = false` locks the user out.
#[derive(Clone)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login name, unique and case-sensitive.
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Access role.
    pub role: Role,
    /// Soft-disable flag.
    pub is_active: bool,
    /// Exhibition this user works at, if any.
    pub assigned_exhibition_id: Option<ExhibitionId>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active account with no assignment.
    #[must_use]
    pub fn new(username: String, password_hash: String, role: Role) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash,
            role,
            is_active: true,
            assigned_exhibition_id: None,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("assigned_exhibition_id", &self.assigned_exhibition_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public view of a [`User`]: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserProfile {
    /// Unique identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Access role.
    pub role: Role,
    /// Soft-disable flag.
    pub is_active: bool,
    /// Exhibition this user works at, if any.
    pub assigned_exhibition_id: Option<ExhibitionId>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_active: user.is_active,
            assigned_exhibition_id: user.assigned_exhibition_id,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Salesman] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn debug_never_prints_the_hash() {
        let user = User::new("rahul".into(), "$2b$10$secret".into(), Role::Salesman);
        let printed = format!("{user:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("rahul"));
    }

    #[test]
    fn profile_serializes_without_hash() {
        let user = User::new("rahul".into(), "$2b$10$secret".into(), Role::Salesman);
        let Ok(json) = serde_json::to_value(UserProfile::from(&user)) else {
            panic!("profile should serialize");
        };
        assert!(json.get("password_hash").is_none());
        assert_eq!(json.get("role").and_then(|r| r.as_str()), Some("SALESMAN"));
    }
}
