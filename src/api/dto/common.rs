//! Extractors and parsing helpers shared by every endpoint.

use axum::extract::{FromRequest, FromRequestParts};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::SalesError;

/// JSON body extractor whose rejection is a [`SalesError::Validation`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(SalesError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejection is a [`SalesError::Validation`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(SalesError))]
pub struct ApiPath<T>(pub T);

/// Query-string extractor whose rejection is a [`SalesError::Validation`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(SalesError))]
pub struct ApiQuery<T>(pub T);

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default, deserialize_with = ...)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, SalesError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            SalesError::Validation(format!(
                "{field} must be an RFC 3339 timestamp or YYYY-MM-DD date"
            ))
        })
}

/// Parses an optional ID; blank counts as absent.
pub(crate) fn parse_id<T>(
    field: &str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, SalesError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => parse(id)
            .map(Some)
            .ok_or_else(|| SalesError::Validation(format!("{field} is not a valid id"))),
    }
}
