//! Immutable order records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ExhibitionId, Money, OrderId, ProductId, ProductSnapshot, Quantity, UserId};
use crate::error::SalesError;

/// Customer details captured on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Delivery address.
    pub address: Option<String>,
}

/// A recorded sale. Append-only: nothing in the crate mutates an order
/// after [`Order::place`] returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Exhibition the sale happened at.
    pub exhibition_id: ExhibitionId,
    /// Salesman who took the order.
    pub salesman_id: UserId,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// Product the snapshot was taken from. Informational only.
    pub product_snapshot_id: ProductId,
    /// Product name frozen at sale time.
    pub product_name: String,
    /// Product SKU frozen at sale time.
    pub product_sku: String,
    /// Unit price frozen at sale time.
    pub product_price: Money,
    /// Units sold.
    pub quantity: Quantity,
    /// `product_price × quantity`.
    pub total_amount: Money,
    /// `"CASH"` or a payment transaction reference.
    pub payment_ref: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new order from a product snapshot, computing the total.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] if the total overflows.
    pub fn place(
        exhibition_id: ExhibitionId,
        salesman_id: UserId,
        customer: Customer,
        product: ProductSnapshot,
        quantity: Quantity,
        payment_ref: String,
    ) -> Result<Self, SalesError> {
        let total_amount = product.price.checked_mul(quantity).ok_or_else(|| {
            SalesError::Validation(format!(
                "order total overflows: {} x {quantity}",
                product.price
            ))
        })?;

        Ok(Self {
            id: OrderId::new(),
            exhibition_id,
            salesman_id,
            customer_name: customer.name,
            customer_phone: customer.phone,
            customer_address: customer.address,
            product_snapshot_id: product.product_id,
            product_name: product.name,
            product_sku: product.sku,
            product_price: product.price,
            quantity,
            total_amount,
            payment_ref,
            created_at: Utc::now(),
        })
    }
}

/// Selection criteria for order listings. Empty filter = all orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    /// Only orders of this exhibition.
    pub exhibition_id: Option<ExhibitionId>,
    /// Only orders of this salesman.
    pub salesman_id: Option<UserId>,
}

impl OrderFilter {
    /// Whether `order` satisfies the exhibition and salesman criteria.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.exhibition_id.is_none_or(|id| order.exhibition_id == id)
            && self.salesman_id.is_none_or(|id| order.salesman_id == id)
    }
}
