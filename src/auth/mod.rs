//! Credentials and sessions.
//!
//! - [`password::PasswordHasher`] wraps bcrypt on the blocking pool.
//! - [`token::TokenSigner`] issues and verifies HMAC-SHA256 signed
//!   session tokens carrying [`token::SessionClaims`].
//! - [`session::Session`] is the axum extractor that turns a bearer
//!   header or `token` cookie into verified claims.

pub mod password;
pub mod session;
pub mod token;

pub use password::PasswordHasher;
pub use session::{Session, SESSION_COOKIE};
pub use token::{SessionClaims, TokenSigner};
