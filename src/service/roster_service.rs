//! Salesman account management.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::{missing_fields, non_blank};
use crate::auth::{PasswordHasher, SessionClaims};
use crate::domain::{ExhibitionId, Role, User, UserId, UserProfile};
use crate::error::SalesError;
use crate::persistence::Store;

/// A salesman account with the name of its assigned exhibition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesmanSummary {
    /// The account.
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Name of the assigned exhibition, if any.
    pub assigned_exhibition_name: Option<String>,
}

/// Admin changes to a salesman account.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesmanPatch {
    /// Activate or lock out.
    pub is_active: Option<bool>,
    /// `Some(None)` unassigns; `Some(Some(id))` (re)assigns.
    pub assigned_exhibition_id: Option<Option<ExhibitionId>>,
}

/// Admin management of the sales staff.
#[derive(Debug, Clone)]
pub struct RosterService {
    store: Arc<dyn Store>,
    hasher: PasswordHasher,
}

impl RosterService {
    /// Creates a new `RosterService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Creates an active, unassigned salesman account.
    ///
    /// The username is stored exactly as given apart from surrounding
    /// whitespace. Only the bcrypt hash of the password is kept.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::MissingFields`]
    /// for a blank username or password, [`SalesError::DuplicateUsername`]
    /// if the name is taken.
    pub async fn create_salesman(
        &self,
        session: &SessionClaims,
        username: &str,
        password: &str,
    ) -> Result<SalesmanSummary, SalesError> {
        session.require(Role::Admin)?;
        let Some(username) = non_blank(username).filter(|_| !password.is_empty()) else {
            return Err(missing_fields(&[
                ("username", username),
                ("password", password),
            ]));
        };
        if self.store.user_by_username(&username).await?.is_some() {
            return Err(SalesError::DuplicateUsername(username));
        }

        let hash = self.hasher.hash(password.to_string()).await?;
        let user = User::new(username, hash, Role::Salesman);
        self.store.insert_user(&user).await?;
        tracing::info!(user = %user.id, username = %user.username, "salesman created");
        Ok(SalesmanSummary {
            profile: UserProfile::from(&user),
            assigned_exhibition_name: None,
        })
    }

    /// Every salesman, newest account first.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin.
    pub async fn list(&self, session: &SessionClaims) -> Result<Vec<SalesmanSummary>, SalesError> {
        session.require(Role::Admin)?;
        let users = self.store.list_users(Some(Role::Salesman)).await?;
        let mut summaries = Vec::with_capacity(users.len());
        for user in &users {
            summaries.push(self.summarize(user).await?);
        }
        Ok(summaries)
    }

    /// One salesman.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::UserNotFound`]
    /// if there is no salesman with this ID.
    pub async fn get(
        &self,
        session: &SessionClaims,
        id: UserId,
    ) -> Result<SalesmanSummary, SalesError> {
        session.require(Role::Admin)?;
        let user = self.load_salesman(id).await?;
        self.summarize(&user).await
    }

    /// Activates, deactivates, assigns or unassigns a salesman.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::UserNotFound`]
    /// if there is no salesman with this ID, [`SalesError::ExhibitionNotFound`]
    /// if the target exhibition does not exist.
    pub async fn update(
        &self,
        session: &SessionClaims,
        id: UserId,
        patch: SalesmanPatch,
    ) -> Result<SalesmanSummary, SalesError> {
        session.require(Role::Admin)?;
        let mut user = self.load_salesman(id).await?;

        if let Some(Some(exhibition)) = patch.assigned_exhibition_id {
            if self.store.exhibition_by_id(exhibition).await?.is_none() {
                return Err(SalesError::ExhibitionNotFound(exhibition.to_string()));
            }
        }
        if let Some(active) = patch.is_active {
            user.is_active = active;
        }
        if let Some(assignment) = patch.assigned_exhibition_id {
            user.assigned_exhibition_id = assignment;
        }

        self.store.update_user(&user).await?;
        tracing::info!(
            user = %user.id,
            active = user.is_active,
            exhibition = ?user.assigned_exhibition_id,
            "salesman updated"
        );
        self.summarize(&user).await
    }

    async fn load_salesman(&self, id: UserId) -> Result<User, SalesError> {
        self.store
            .user_by_id(id)
            .await?
            .filter(|u| u.role == Role::Salesman)
            .ok_or(SalesError::UserNotFound(id))
    }

    async fn summarize(&self, user: &User) -> Result<SalesmanSummary, SalesError> {
        let assigned_exhibition_name = match user.assigned_exhibition_id {
            Some(id) => self.store.exhibition_by_id(id).await?.map(|e| e.name),
            None => None,
        };
        Ok(SalesmanSummary {
            profile: UserProfile::from(user),
            assigned_exhibition_name,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ExhibitionStatus;
    use crate::service::testkit::{Fixture, claims};

    fn roster(fx: &Fixture) -> RosterService {
        RosterService::new(fx.store(), PasswordHasher::default())
    }

    #[tokio::test]
    async fn create_hashes_the_password() {
        let fx = Fixture::new();
        let roster = roster(&fx);
        let admin = fx.admin().await;

        let Ok(created) = roster.create_salesman(&admin, "anita", "pa55word").await else {
            panic!("create failed");
        };
        assert_eq!(created.profile.role, Role::Salesman);
        assert!(created.profile.is_active);

        let Ok(Some(stored)) = fx.store.user_by_username("anita").await else {
            panic!("salesman not stored");
        };
        assert_ne!(stored.password_hash, "pa55word");
        assert!(stored.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn create_rejects_duplicates_blanks_and_non_admins() {
        let fx = Fixture::new();
        let roster = roster(&fx);
        let admin = fx.admin().await;
        let salesman = claims(&fx.user("ravi", Role::Salesman).await);

        assert!(matches!(
            roster.create_salesman(&admin, "ravi", "x").await,
            Err(SalesError::DuplicateUsername(_))
        ));
        let Err(SalesError::MissingFields(missing)) =
            roster.create_salesman(&admin, "new", "").await
        else {
            panic!("expected missing password");
        };
        assert_eq!(missing, ["password"]);
        assert!(matches!(
            roster.create_salesman(&salesman, "other", "x").await,
            Err(SalesError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn assignment_must_reference_an_existing_exhibition() {
        let fx = Fixture::new();
        let roster = roster(&fx);
        let admin = fx.admin().await;
        let ravi = fx.user("ravi", Role::Salesman).await;
        let expo = fx.exhibition("Expo", ExhibitionStatus::Live).await;

        let missing = SalesmanPatch {
            assigned_exhibition_id: Some(Some(ExhibitionId::new())),
            ..SalesmanPatch::default()
        };
        assert!(matches!(
            roster.update(&admin, ravi.id, missing).await,
            Err(SalesError::ExhibitionNotFound(_))
        ));

        let assign = SalesmanPatch {
            assigned_exhibition_id: Some(Some(expo.id)),
            ..SalesmanPatch::default()
        };
        let Ok(assigned) = roster.update(&admin, ravi.id, assign).await else {
            panic!("assign failed");
        };
        assert_eq!(assigned.profile.assigned_exhibition_id, Some(expo.id));
        assert_eq!(assigned.assigned_exhibition_name.as_deref(), Some("Expo"));

        let unassign = SalesmanPatch {
            assigned_exhibition_id: Some(None),
            is_active: Some(false),
        };
        let Ok(cleared) = roster.update(&admin, ravi.id, unassign).await else {
            panic!("unassign failed");
        };
        assert_eq!(cleared.profile.assigned_exhibition_id, None);
        assert!(!cleared.profile.is_active);
    }

    #[tokio::test]
    async fn admins_are_not_part_of_the_roster() {
        let fx = Fixture::new();
        let roster = roster(&fx);
        let admin = fx.admin().await;
        let _ = fx.user("ravi", Role::Salesman).await;

        assert!(matches!(
            roster.get(&admin, admin.id).await,
            Err(SalesError::UserNotFound(_))
        ));
        let Ok(listed) = roster.list(&admin).await else {
            panic!("list failed");
        };
        assert_eq!(listed.len(), 1);
    }
}
