//! Exhibitions and their lifecycle status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ExhibitionId;
use crate::error::SalesError;

/// Lifecycle status of an exhibition.
///
/// Orders may only be taken while `Live`. Transitions are not ordered:
/// an admin may move an exhibition to any status at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExhibitionStatus {
    /// Being prepared; no orders.
    Planning,
    /// Open for orders.
    Live,
    /// Finished; no orders.
    Closed,
}

impl ExhibitionStatus {
    /// Canonical upper-case name, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "PLANNING",
            Self::Live => "LIVE",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether orders may be taken in this status.
    #[must_use]
    pub const fn accepts_orders(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl fmt::Display for ExhibitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExhibitionStatus {
    type Err = SalesError;

    /// Case-insensitive parse of `PLANNING`, `LIVE` or `CLOSED`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLANNING" => Ok(Self::Planning),
            "LIVE" => Ok(Self::Live),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(SalesError::InvalidStatus(s.to_string())),
        }
    }
}

/// A time-boxed sales event in a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Exhibition {
    /// Unique identifier.
    pub id: ExhibitionId,
    /// Display name.
    pub name: String,
    /// Host city.
    pub city: String,
    /// Opening day.
    pub start_date: DateTime<Utc>,
    /// Closing day, if known.
    pub end_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: ExhibitionStatus,
    /// Free-text description.
    pub description: Option<String>,
    /// Optional picture.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create an exhibition.
#[derive(Debug, Clone)]
pub struct NewExhibition {
    /// Display name.
    pub name: String,
    /// Host city.
    pub city: String,
    /// Opening day.
    pub start_date: DateTime<Utc>,
    /// Closing day.
    pub end_date: Option<DateTime<Utc>>,
    /// Description.
    pub description: Option<String>,
    /// Picture.
    pub image_url: Option<String>,
}

/// Partial update of an [`Exhibition`]. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ExhibitionPatch {
    /// New name.
    pub name: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New opening day.
    pub start_date: Option<DateTime<Utc>>,
    /// New closing day.
    pub end_date: Option<Option<DateTime<Utc>>>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New picture.
    pub image_url: Option<Option<String>>,
    /// New status.
    pub status: Option<ExhibitionStatus>,
}

impl Exhibition {
    /// Creates an exhibition. The status always starts at `Planning`.
    #[must_use]
    pub fn new(fields: NewExhibition) -> Self {
        Self {
            id: ExhibitionId::new(),
            name: fields.name,
            city: fields.city,
            start_date: fields.start_date,
            end_date: fields.end_date,
            status: ExhibitionStatus::Planning,
            description: fields.description,
            image_url: fields.image_url,
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: ExhibitionPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    /// Checks that the closing day does not precede the opening day.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] if `end_date < start_date`.
    pub fn check_dates(&self) -> Result<(), SalesError> {
        match self.end_date {
            Some(end) if end < self.start_date => Err(SalesError::Validation(
                "end_date must not be before start_date".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
