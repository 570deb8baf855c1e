//! Catalog products and the price snapshot taken at sale time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Money, ProductId};

/// A catalog product. Soft-disabled via `is_active`, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Stock keeping unit, unique across the catalog.
    pub sku: String,
    /// Current list price. Changes never affect existing orders.
    pub base_price: Money,
    /// Optional picture.
    pub image_url: Option<String>,
    /// Whether new orders may reference this product.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial update of a [`Product`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    /// New display name.
    pub name: Option<String>,
    /// New SKU.
    pub sku: Option<String>,
    /// New list price.
    pub base_price: Option<Money>,
    /// `Some(None)` clears the image.
    pub image_url: Option<Option<String>>,
    /// Activate or soft-delete.
    pub is_active: Option<bool>,
}

impl Product {
    /// Creates a new active product.
    #[must_use]
    pub fn new(name: String, sku: String, base_price: Money, image_url: Option<String>) -> Self {
        Self {
            id: ProductId::new(),
            name,
            sku,
            base_price,
            image_url,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
        if let Some(price) = patch.base_price {
            self.base_price = price;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
    }

    /// Copies the fields an order freezes at creation time.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id,
            name: self.name.clone(),
            sku: self.sku.clone(),
            price: self.base_price,
        }
    }
}

/// Owned copy of a product's sale-relevant fields.
///
/// Holds values, not a reference: later edits to the product cannot reach
/// an order built from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Product the snapshot was taken from.
    pub product_id: ProductId,
    /// Name at sale time.
    pub name: String,
    /// SKU at sale time.
    pub sku: String,
    /// Unit price at sale time.
    pub price: Money,
}
