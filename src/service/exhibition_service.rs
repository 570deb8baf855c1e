//! Exhibition management and lifecycle.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::{missing_fields, non_blank, required};
use crate::auth::SessionClaims;
use crate::domain::{
    Exhibition, ExhibitionId, ExhibitionPatch, ExhibitionStatus, NewExhibition, OrderFilter, Role,
    UserProfile,
};
use crate::error::SalesError;
use crate::persistence::Store;

/// An exhibition with its order and salesman counts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExhibitionSummary {
    /// The exhibition.
    #[serde(flatten)]
    pub exhibition: Exhibition,
    /// Orders recorded against it.
    pub order_count: u64,
    /// Salesmen currently assigned to it.
    pub salesman_count: u64,
}

/// An exhibition with counts and the assigned salesmen.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExhibitionDetail {
    /// Exhibition plus counts.
    #[serde(flatten)]
    pub summary: ExhibitionSummary,
    /// Salesmen currently assigned, by username.
    pub salesmen: Vec<UserProfile>,
}

/// CRUD and status control for exhibitions.
#[derive(Debug, Clone)]
pub struct ExhibitionService {
    store: Arc<dyn Store>,
}

impl ExhibitionService {
    /// Creates a new `ExhibitionService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates an exhibition in `PLANNING` status.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::MissingFields`]
    /// for a blank name or city, [`SalesError::Validation`] if `end_date`
    /// precedes `start_date`.
    pub async fn create(
        &self,
        session: &SessionClaims,
        mut fields: NewExhibition,
    ) -> Result<Exhibition, SalesError> {
        session.require(Role::Admin)?;
        let (Some(name), Some(city)) = (non_blank(&fields.name), non_blank(&fields.city)) else {
            return Err(missing_fields(&[("name", &fields.name), ("city", &fields.city)]));
        };
        fields.name = name;
        fields.city = city;

        let exhibition = Exhibition::new(fields);
        exhibition.check_dates()?;
        self.store.insert_exhibition(&exhibition).await?;
        tracing::info!(exhibition = %exhibition.id, name = %exhibition.name, "exhibition created");
        Ok(exhibition)
    }

    /// Moves an exhibition to any status. `status` is matched
    /// case-insensitively against `PLANNING`, `LIVE` and `CLOSED`.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::InvalidStatus`]
    /// for an unknown status, [`SalesError::ExhibitionNotFound`] if absent.
    pub async fn set_status(
        &self,
        session: &SessionClaims,
        id: ExhibitionId,
        status: &str,
    ) -> Result<Exhibition, SalesError> {
        session.require(Role::Admin)?;
        let status: ExhibitionStatus = status.parse()?;
        let mut exhibition = self.load(id).await?;
        let previous = exhibition.status;
        exhibition.status = status;
        self.store.update_exhibition(&exhibition).await?;
        tracing::info!(exhibition = %id, from = %previous, to = %status, "exhibition status changed");
        Ok(exhibition)
    }

    /// Partially updates an exhibition, status included.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::ExhibitionNotFound`]
    /// if absent, [`SalesError::Validation`] for a blank name or city or
    /// inverted dates.
    pub async fn update(
        &self,
        session: &SessionClaims,
        id: ExhibitionId,
        mut patch: ExhibitionPatch,
    ) -> Result<Exhibition, SalesError> {
        session.require(Role::Admin)?;
        patch.name = patch.name.map(|v| required("name", &v)).transpose()?;
        patch.city = patch.city.map(|v| required("city", &v)).transpose()?;

        let mut exhibition = self.load(id).await?;
        let previous = exhibition.status;
        exhibition.apply(patch);
        exhibition.check_dates()?;
        self.store.update_exhibition(&exhibition).await?;
        if previous == exhibition.status {
            tracing::info!(exhibition = %id, "exhibition updated");
        } else {
            tracing::info!(exhibition = %id, from = %previous, to = %exhibition.status, "exhibition updated with status change");
        }
        Ok(exhibition)
    }

    /// One exhibition with counts and assigned salesmen.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::ExhibitionNotFound`]
    /// if absent.
    pub async fn get(
        &self,
        session: &SessionClaims,
        id: ExhibitionId,
    ) -> Result<ExhibitionDetail, SalesError> {
        session.require(Role::Admin)?;
        let exhibition = self.load(id).await?;
        let salesmen: Vec<UserProfile> = self
            .store
            .users_assigned_to(id)
            .await?
            .iter()
            .filter(|u| u.role == Role::Salesman)
            .map(UserProfile::from)
            .collect();
        let order_count = self.order_count(id).await?;
        Ok(ExhibitionDetail {
            summary: ExhibitionSummary {
                exhibition,
                order_count,
                salesman_count: u64::try_from(salesmen.len()).unwrap_or(u64::MAX),
            },
            salesmen,
        })
    }

    /// Every exhibition with counts, newest start date first.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin.
    pub async fn list(&self, session: &SessionClaims) -> Result<Vec<ExhibitionSummary>, SalesError> {
        session.require(Role::Admin)?;
        let exhibitions = self.store.list_exhibitions(None).await?;
        let mut summaries = Vec::with_capacity(exhibitions.len());
        for exhibition in exhibitions {
            let order_count = self.order_count(exhibition.id).await?;
            let salesman_count = self
                .store
                .users_assigned_to(exhibition.id)
                .await?
                .iter()
                .filter(|u| u.role == Role::Salesman)
                .count();
            summaries.push(ExhibitionSummary {
                exhibition,
                order_count,
                salesman_count: u64::try_from(salesman_count).unwrap_or(u64::MAX),
            });
        }
        Ok(summaries)
    }

    /// Live exhibitions, newest start date first. Open to any signed-in user.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] if the store is unavailable.
    pub async fn list_live(&self, _session: &SessionClaims) -> Result<Vec<Exhibition>, SalesError> {
        self.store
            .list_exhibitions(Some(ExhibitionStatus::Live))
            .await
    }

    async fn load(&self, id: ExhibitionId) -> Result<Exhibition, SalesError> {
        self.store
            .exhibition_by_id(id)
            .await?
            .ok_or_else(|| SalesError::ExhibitionNotFound(id.to_string()))
    }

    async fn order_count(&self, id: ExhibitionId) -> Result<u64, SalesError> {
        self.store
            .count_orders(&OrderFilter {
                exhibition_id: Some(id),
                ..OrderFilter::default()
            })
            .await
    }
}
