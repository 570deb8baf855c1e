//! Salesman roster request bodies.

use serde::Deserialize;
use utoipa::ToSchema;

use super::common::{double_option, parse_id};
use crate::domain::ExhibitionId;
use crate::error::SalesError;
use crate::service::SalesmanPatch;

/// Request body for `POST /salesmen`.
#[derive(Deserialize, ToSchema)]
pub struct CreateSalesmanRequest {
    /// Unique, case-sensitive login name.
    #[serde(default)]
    pub username: String,
    /// Initial password; only its bcrypt hash is stored.
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CreateSalesmanRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateSalesmanRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Request body for `PATCH /salesmen/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSalesmanRequest {
    /// Activate or lock out the account.
    pub is_active: Option<bool>,
    /// Exhibition to assign; `null` or `""` unassigns.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub assigned_exhibition_id: Option<Option<String>>,
}

impl TryFrom<UpdateSalesmanRequest> for SalesmanPatch {
    type Error = SalesError;

    fn try_from(req: UpdateSalesmanRequest) -> Result<Self, Self::Error> {
        let assigned_exhibition_id = req
            .assigned_exhibition_id
            .map(|raw| {
                parse_id(
                    "assigned_exhibition_id",
                    raw.as_deref(),
                    ExhibitionId::parse,
                )
            })
            .transpose()?;
        Ok(Self {
            is_active: req.is_active,
            assigned_exhibition_id,
        })
    }
}
