//! Service layer: business rules and access control.
//!
//! Each service owns an `Arc<dyn Store>` and nothing else mutable. Every
//! operation takes the caller's [`SessionClaims`](crate::auth::SessionClaims)
//! and enforces its role gate before touching the store.
//!
//! - [`AuthService`]: login, token verification, current profile.
//! - [`CatalogService`]: products.
//! - [`ExhibitionService`]: exhibitions and their lifecycle.
//! - [`RosterService`]: salesman accounts.
//! - [`OrderService`]: order capture and order listings.
//! - [`ReportService`]: revenue rollups, dashboards and report tables.

pub mod auth_service;
pub mod bootstrap;
pub mod catalog_service;
pub mod exhibition_service;
pub mod order_service;
pub mod report_service;
pub mod roster_service;
mod views;

#[cfg(test)]
pub(crate) mod testkit;

pub use auth_service::{AuthService, LoginOutcome};
pub use bootstrap::ensure_admin;
pub use catalog_service::{CatalogService, NewProduct};
pub use exhibition_service::{ExhibitionDetail, ExhibitionService, ExhibitionSummary};
pub use order_service::{OrderDraft, OrderService};
pub use report_service::{Dashboard, ExhibitionReport, ReportService, SalesmanReport};
pub use roster_service::{RosterService, SalesmanPatch, SalesmanSummary};

use crate::error::SalesError;

/// Trimmed `value`, or `None` if it is blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed `value`, or a validation error naming `field` if it is blank.
pub(crate) fn required(field: &str, value: &str) -> Result<String, SalesError> {
    non_blank(value).ok_or_else(|| SalesError::Validation(format!("{field} must not be blank")))
}

/// A [`SalesError::MissingFields`] naming every blank `(field, value)` pair.
pub(crate) fn missing_fields(fields: &[(&str, &str)]) -> SalesError {
    SalesError::MissingFields(
        fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| (*field).to_string())
            .collect(),
    )
}
