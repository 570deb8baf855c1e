//! Exhibition request bodies.

use serde::Deserialize;
use utoipa::ToSchema;

use super::common::{double_option, parse_datetime};
use crate::domain::{ExhibitionPatch, ExhibitionStatus, NewExhibition};
use crate::error::SalesError;

/// Request body for `POST /exhibitions`. The status always starts at
/// `PLANNING`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateExhibitionRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Host city.
    #[serde(default)]
    pub city: String,
    /// Opening day: RFC 3339 timestamp or `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Closing day: RFC 3339 timestamp or `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Picture URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<CreateExhibitionRequest> for NewExhibition {
    type Error = SalesError;

    fn try_from(req: CreateExhibitionRequest) -> Result<Self, Self::Error> {
        let start_date = match non_empty(req.start_date) {
            Some(raw) => parse_datetime("start_date", &raw)?,
            None => return Err(SalesError::MissingFields(vec!["start_date".to_string()])),
        };
        let end_date = non_empty(req.end_date)
            .map(|raw| parse_datetime("end_date", &raw))
            .transpose()?;
        Ok(Self {
            name: req.name,
            city: req.city,
            start_date,
            end_date,
            description: non_empty(req.description),
            image_url: non_empty(req.image_url),
        })
    }
}

/// Request body for `PATCH /exhibitions/{id}`. Absent fields are unchanged;
/// `null` clears an optional field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateExhibitionRequest {
    /// New name.
    pub name: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New opening day.
    pub start_date: Option<String>,
    /// New closing day; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<String>>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// New picture URL; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    /// New status: `PLANNING`, `LIVE` or `CLOSED` (any case).
    pub status: Option<String>,
}

impl TryFrom<UpdateExhibitionRequest> for ExhibitionPatch {
    type Error = SalesError;

    fn try_from(req: UpdateExhibitionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name,
            city: req.city,
            start_date: req
                .start_date
                .map(|raw| parse_datetime("start_date", &raw))
                .transpose()?,
            end_date: req
                .end_date
                .map(|end| {
                    non_empty(end)
                        .map(|raw| parse_datetime("end_date", &raw))
                        .transpose()
                })
                .transpose()?,
            description: req.description.map(non_empty),
            image_url: req.image_url.map(non_empty),
            status: req
                .status
                .map(|raw| raw.parse::<ExhibitionStatus>())
                .transpose()?,
        })
    }
}

/// Request body for `PUT /exhibitions/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    /// `PLANNING`, `LIVE` or `CLOSED` (any case).
    #[serde(default)]
    pub status: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
