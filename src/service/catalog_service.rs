//! Product catalog management.

use std::sync::Arc;

use super::{missing_fields, non_blank, required};
use crate::auth::SessionClaims;
use crate::domain::{Money, Product, ProductId, ProductPatch, Role};
use crate::error::SalesError;
use crate::persistence::Store;

/// Fields of a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Unique SKU.
    pub sku: String,
    /// List price.
    pub base_price: Money,
    /// Optional picture.
    pub image_url: Option<String>,
}

/// Admin CRUD over products; read access for every signed-in user.
///
/// Products are never deleted. Deactivation (`is_active = false`) hides a
/// product from sale while existing orders keep their frozen copy.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    /// Creates a new `CatalogService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Adds a product to the catalog.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::MissingFields`]
    /// for a blank name or SKU, [`SalesError::DuplicateSku`] if the SKU is
    /// taken.
    pub async fn create(
        &self,
        session: &SessionClaims,
        input: NewProduct,
    ) -> Result<Product, SalesError> {
        session.require(Role::Admin)?;
        let (Some(name), Some(sku)) = (non_blank(&input.name), non_blank(&input.sku)) else {
            return Err(missing_fields(&[("name", &input.name), ("sku", &input.sku)]));
        };

        let product = Product::new(name, sku, input.base_price, input.image_url);
        self.store.insert_product(&product).await?;
        tracing::info!(product = %product.id, sku = %product.sku, price = %product.base_price, "product created");
        Ok(product)
    }

    /// Partially updates a product, active or not.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::ProductNotFound`]
    /// if absent, [`SalesError::Validation`] for a blank name or SKU,
    /// [`SalesError::DuplicateSku`] if the new SKU is taken.
    pub async fn update(
        &self,
        session: &SessionClaims,
        id: ProductId,
        mut patch: ProductPatch,
    ) -> Result<Product, SalesError> {
        session.require(Role::Admin)?;
        patch.name = patch.name.map(|v| required("name", &v)).transpose()?;
        patch.sku = patch.sku.map(|v| required("sku", &v)).transpose()?;

        let mut product = self
            .store
            .product_by_id(id)
            .await?
            .ok_or_else(|| SalesError::ProductNotFound(id.to_string()))?;
        product.apply(patch);
        self.store.update_product(&product).await?;
        tracing::info!(
            product = %product.id,
            sku = %product.sku,
            price = %product.base_price,
            active = product.is_active,
            "product updated"
        );
        Ok(product)
    }

    /// Active products, by name. Open to any signed-in user.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] if the store is unavailable.
    pub async fn list_active(&self, _session: &SessionClaims) -> Result<Vec<Product>, SalesError> {
        self.store.list_products(true).await
    }

    /// Every product, active or not, by name.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin.
    pub async fn list_all(&self, session: &SessionClaims) -> Result<Vec<Product>, SalesError> {
        session.require(Role::Admin)?;
        self.store.list_products(false).await
    }
}
