//! Data Transfer Objects for REST request deserialization.
//!
//! Request bodies are deliberately lenient (optional fields, numbers as
//! strings) and converted into service inputs with `TryFrom`, so that
//! malformed input is reported as a `validation_error` with a precise
//! message. Responses serialize domain and service types directly.

pub mod auth_dto;
pub mod common;
pub mod exhibition_dto;
pub mod order_dto;
pub mod product_dto;
pub mod salesman_dto;

pub use auth_dto::*;
pub use common::{ApiJson, ApiPath, ApiQuery};
pub use exhibition_dto::*;
pub use order_dto::*;
pub use product_dto::*;
pub use salesman_dto::*;
