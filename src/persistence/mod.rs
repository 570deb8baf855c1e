//! Persistence layer: the [`Store`] trait and its implementations.
//!
//! [`postgres::PostgresStore`] is the production backend (`sqlx::PgPool`).
//! [`memory::MemoryStore`] keeps everything in process and backs the test
//! suite and `PERSISTENCE_ENABLED=false` runs.
//!
//! Services construct complete entity values (IDs, timestamps, frozen
//! order fields) and hand them to the store verbatim; a store never
//! derives one field from another.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    Exhibition, ExhibitionId, ExhibitionStatus, Order, OrderFilter, OrderId, Product, ProductId,
    Role, User, UserId,
};
use crate::error::SalesError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Durable storage for users, products, exhibitions and orders.
///
/// Ordering contracts:
/// - users: `created_at` descending
/// - products: `name` ascending
/// - exhibitions: `start_date` descending
/// - orders: `created_at` descending (newest first)
///
/// There is deliberately no way to update or delete an order.
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug {
    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// [`SalesError::DuplicateUsername`] if the username is taken,
    /// [`SalesError::Persistence`] on backend failure.
    async fn insert_user(&self, user: &User) -> Result<(), SalesError>;

    /// Overwrites a user's mutable fields.
    ///
    /// # Errors
    ///
    /// [`SalesError::UserNotFound`] if absent, [`SalesError::Persistence`]
    /// on backend failure.
    async fn update_user(&self, user: &User) -> Result<(), SalesError>;

    /// Looks up a user by ID.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, SalesError>;

    /// Looks up a user by exact (case-sensitive) username.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, SalesError>;

    /// Lists users, optionally restricted to one role.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, SalesError>;

    /// Lists users assigned to an exhibition.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn users_assigned_to(&self, exhibition: ExhibitionId) -> Result<Vec<User>, SalesError>;

    /// Inserts a product.
    ///
    /// # Errors
    ///
    /// [`SalesError::DuplicateSku`] if the SKU is taken,
    /// [`SalesError::Persistence`] on backend failure.
    async fn insert_product(&self, product: &Product) -> Result<(), SalesError>;

    /// Overwrites a product's mutable fields.
    ///
    /// # Errors
    ///
    /// [`SalesError::ProductNotFound`] if absent, [`SalesError::DuplicateSku`]
    /// if the new SKU is taken, [`SalesError::Persistence`] on failure.
    async fn update_product(&self, product: &Product) -> Result<(), SalesError>;

    /// Looks up a product by ID, active or not.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, SalesError>;

    /// Lists products, optionally only the active ones.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn list_products(&self, active_only: bool) -> Result<Vec<Product>, SalesError>;

    /// Inserts an exhibition.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn insert_exhibition(&self, exhibition: &Exhibition) -> Result<(), SalesError>;

    /// Overwrites an exhibition's mutable fields.
    ///
    /// # Errors
    ///
    /// [`SalesError::ExhibitionNotFound`] if absent,
    /// [`SalesError::Persistence`] on backend failure.
    async fn update_exhibition(&self, exhibition: &Exhibition) -> Result<(), SalesError>;

    /// Looks up an exhibition by ID.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn exhibition_by_id(&self, id: ExhibitionId) -> Result<Option<Exhibition>, SalesError>;

    /// Lists exhibitions, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn list_exhibitions(
        &self,
        status: Option<ExhibitionStatus>,
    ) -> Result<Vec<Exhibition>, SalesError>;

    /// Appends an order in a single atomic write.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn insert_order(&self, order: &Order) -> Result<(), SalesError>;

    /// Looks up an order by ID.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, SalesError>;

    /// Lists orders matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, SalesError>;

    /// Counts orders matching `filter`.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] on backend failure.
    async fn count_orders(&self, filter: &OrderFilter) -> Result<u64, SalesError>;
}
