//! Service error types with HTTP status code mapping.
//!
//! [`SalesError`] is the central error type. Each variant belongs to one
//! [`ErrorKind`] of the public taxonomy, carries a numeric code, and maps
//! to an HTTP status code and structured JSON error response.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ExhibitionId, ExhibitionStatus, OrderId, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "kind": "state_conflict",
///     "message": "exhibition 6f1c… is not live (status CLOSED)"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, kind and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the table on [`SalesError`]).
    pub code: u32,
    /// Taxonomy bucket of the error.
    pub kind: ErrorKind,
    /// Human-readable error message, safe to display directly.
    pub message: String,
    /// Optional machine-readable details (e.g. the missing field names).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Public error taxonomy shared by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input; the client must correct it.
    ValidationError,
    /// No session, invalid session, or wrong role.
    Unauthorized,
    /// A referenced entity does not exist.
    NotFound,
    /// The operation is not permitted in the current state.
    StateConflict,
    /// The backing store is unavailable or a write failed. Transient.
    PersistenceFailure,
    /// Unexpected server-side failure.
    InternalError,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Kind                | HTTP Status                 |
/// |-----------|---------------------|-----------------------------|
/// | 1000–1999 | validation_error    | 400 Bad Request             |
/// | 2000–2999 | unauthorized        | 401 Unauthorized            |
/// | 3000–3999 | not_found           | 404 Not Found               |
/// | 4000–4999 | state_conflict      | 409 Conflict                |
/// | 5000–5999 | persistence/internal| 503 / 500                   |
#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    Validation(String),

    /// One or more required fields were absent or blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// No exhibition was given and the salesman has none assigned.
    #[error("exhibition id is required: none given and none assigned")]
    MissingExhibition,

    /// Unknown exhibition status string.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Missing session, invalid session, or wrong role. Deliberately generic.
    #[error("unauthorized")]
    Unauthorized,

    /// Unknown user, inactive user, or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session token is malformed, tampered with, or expired.
    #[error("invalid or expired session")]
    InvalidToken,

    /// No exhibition matches the given reference (an ID, or a string that
    /// is not one).
    #[error("exhibition not found: {0}")]
    ExhibitionNotFound(String),

    /// No active product matches the given reference (an ID, or a string
    /// that is not one).
    #[error("product not found or inactive: {0}")]
    ProductNotFound(String),

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Order with the given ID was not found.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Orders can only be taken while an exhibition is live.
    #[error("exhibition {id} is not live (status {status})")]
    ExhibitionNotLive {
        /// Target exhibition.
        id: ExhibitionId,
        /// Its status at validation time.
        status: ExhibitionStatus,
    },

    /// Another product already uses this SKU.
    #[error("duplicate sku: {0}")]
    DuplicateSku(String),

    /// Another user already uses this username.
    #[error("duplicate username: {0}")]
    DuplicateUsername(String),

    /// Persistence layer failure or timeout.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SalesError {
    /// Returns the taxonomy bucket for this variant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::MissingFields(_)
            | Self::MissingExhibition
            | Self::InvalidStatus(_) => ErrorKind::ValidationError,
            Self::Unauthorized | Self::InvalidCredentials | Self::InvalidToken => {
                ErrorKind::Unauthorized
            }
            Self::ExhibitionNotFound(_)
            | Self::ProductNotFound(_)
            | Self::UserNotFound(_)
            | Self::OrderNotFound(_) => ErrorKind::NotFound,
            Self::ExhibitionNotLive { .. } | Self::DuplicateSku(_) | Self::DuplicateUsername(_) => {
                ErrorKind::StateConflict
            }
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
            Self::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::MissingFields(_) => 1002,
            Self::MissingExhibition => 1003,
            Self::InvalidStatus(_) => 1004,
            Self::Unauthorized => 2001,
            Self::InvalidCredentials => 2002,
            Self::InvalidToken => 2003,
            Self::ExhibitionNotFound(_) => 3001,
            Self::ProductNotFound(_) => 3002,
            Self::UserNotFound(_) => 3003,
            Self::OrderNotFound(_) => 3004,
            Self::ExhibitionNotLive { .. } => 4001,
            Self::DuplicateSku(_) => 4002,
            Self::DuplicateUsername(_) => 4003,
            Self::Internal(_) => 5000,
            Self::Persistence(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StateConflict => StatusCode::CONFLICT,
            ErrorKind::PersistenceFailure => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::MissingFields(fields) => Some(fields.clone()),
            _ => None,
        }
    }
}

impl From<JsonRejection> for SalesError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for SalesError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for SalesError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for SalesError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
