//! In-process store backed by `tokio::sync::RwLock` maps.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::domain::{
    Exhibition, ExhibitionId, ExhibitionStatus, Order, OrderFilter, OrderId, Product, ProductId,
    Role, User, UserId,
};
use crate::error::SalesError;

/// In-memory [`Store`].
///
/// Each collection sits behind its own `RwLock`, so reads of different
/// collections never contend. Orders are an append-only `Vec` in insertion
/// order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    products: RwLock<HashMap<ProductId, Product>>,
    exhibitions: RwLock<HashMap<ExhibitionId, Exhibition>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), SalesError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(SalesError::DuplicateUsername(user.username.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), SalesError> {
        let mut users = self.users.write().await;
        let slot = users
            .get_mut(&user.id)
            .ok_or(SalesError::UserNotFound(user.id))?;
        *slot = user.clone();
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, SalesError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, SalesError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, SalesError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn users_assigned_to(&self, exhibition: ExhibitionId) -> Result<Vec<User>, SalesError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.assigned_exhibition_id == Some(exhibition))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn insert_product(&self, product: &Product) -> Result<(), SalesError> {
        let mut products = self.products.write().await;
        if products.values().any(|p| p.sku == product.sku) {
            return Err(SalesError::DuplicateSku(product.sku.clone()));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), SalesError> {
        let mut products = self.products.write().await;
        if products
            .values()
            .any(|p| p.sku == product.sku && p.id != product.id)
        {
            return Err(SalesError::DuplicateSku(product.sku.clone()));
        }
        let slot = products
            .get_mut(&product.id)
            .ok_or_else(|| SalesError::ProductNotFound(product.id.to_string()))?;
        *slot = product.clone();
        Ok(())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, SalesError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list_products(&self, active_only: bool) -> Result<Vec<Product>, SalesError> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn insert_exhibition(&self, exhibition: &Exhibition) -> Result<(), SalesError> {
        self.exhibitions
            .write()
            .await
            .insert(exhibition.id, exhibition.clone());
        Ok(())
    }

    async fn update_exhibition(&self, exhibition: &Exhibition) -> Result<(), SalesError> {
        let mut exhibitions = self.exhibitions.write().await;
        let slot = exhibitions
            .get_mut(&exhibition.id)
            .ok_or_else(|| SalesError::ExhibitionNotFound(exhibition.id.to_string()))?;
        *slot = exhibition.clone();
        Ok(())
    }

    async fn exhibition_by_id(&self, id: ExhibitionId) -> Result<Option<Exhibition>, SalesError> {
        Ok(self.exhibitions.read().await.get(&id).cloned())
    }

    async fn list_exhibitions(
        &self,
        status: Option<ExhibitionStatus>,
    ) -> Result<Vec<Exhibition>, SalesError> {
        let mut exhibitions: Vec<Exhibition> = self
            .exhibitions
            .read()
            .await
            .values()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        exhibitions.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(exhibitions)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), SalesError> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, SalesError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, SalesError> {
        // Reverse insertion order first so equal timestamps stay newest-first
        // under the stable sort.
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .iter()
            .rev()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn count_orders(&self, filter: &OrderFilter) -> Result<u64, SalesError> {
        let count = self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| filter.matches(o))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
