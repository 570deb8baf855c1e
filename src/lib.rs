//! # expo-sales
//!
//! Order capture and revenue reporting for retail exhibitions.
//!
//! Admins run the catalog, the exhibition calendar and the sales staff.
//! Salesmen record orders while an exhibition is `LIVE`; every order
//! freezes the product's name, SKU and price at the moment of sale, so
//! revenue reports never move when the catalog changes.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP: bearer token or session cookie)
//!     │
//!     ├── REST Handlers + DTOs (api/)
//!     ├── Session extractor (auth/)
//!     │
//!     ├── Auth / Catalog / Exhibition / Roster / Order / Report services (service/)
//!     │
//!     ├── Entities, money, revenue rollups (domain/)
//!     │
//!     └── Store: in-memory or PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
