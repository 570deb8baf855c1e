//! Database row types and their conversion into domain entities.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Exhibition, ExhibitionStatus, Money, Order, Product, Quantity, Role, User,
};
use crate::error::SalesError;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// bcrypt hash.
    pub password_hash: String,
    /// `ADMIN` or `SALESMAN`.
    pub role: String,
    /// Soft-disable flag.
    pub is_active: bool,
    /// Optional exhibition assignment.
    pub assigned_exhibition_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique SKU.
    pub sku: String,
    /// List price in whole currency units.
    pub base_price: i64,
    /// Optional picture.
    pub image_url: Option<String>,
    /// Soft-disable flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A row from the `exhibitions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExhibitionRow {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Host city.
    pub city: String,
    /// Opening day.
    pub start_date: DateTime<Utc>,
    /// Closing day.
    pub end_date: Option<DateTime<Utc>>,
    /// `PLANNING`, `LIVE` or `CLOSED`.
    pub status: String,
    /// Description.
    pub description: Option<String>,
    /// Picture.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A row from the `orders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    /// Primary key.
    pub id: Uuid,
    /// Exhibition reference.
    pub exhibition_id: Uuid,
    /// Salesman reference.
    pub salesman_id: Uuid,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// Informational product reference (no foreign key).
    pub product_snapshot_id: Uuid,
    /// Frozen product name.
    pub product_name: String,
    /// Frozen product SKU.
    pub product_sku: String,
    /// Frozen unit price.
    pub product_price: i64,
    /// Units sold.
    pub quantity: i64,
    /// Frozen order total.
    pub total_amount: i64,
    /// Payment reference.
    pub payment_ref: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

fn corrupt(what: &str, detail: impl std::fmt::Display) -> SalesError {
    SalesError::Persistence(format!("corrupt {what} column: {detail}"))
}

fn money(column: &str, units: i64) -> Result<Money, SalesError> {
    Money::new(units).map_err(|_| corrupt(column, units))
}

impl TryFrom<UserRow> for User {
    type Error = SalesError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            username: row.username,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>().map_err(|e| corrupt("role", e))?,
            is_active: row.is_active,
            assigned_exhibition_id: row.assigned_exhibition_id.map(Into::into),
            created_at: row.created_at,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = SalesError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: row.name,
            sku: row.sku,
            base_price: money("base_price", row.base_price)?,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<ExhibitionRow> for Exhibition {
    type Error = SalesError;

    fn try_from(row: ExhibitionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: row.name,
            city: row.city,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row
                .status
                .parse::<ExhibitionStatus>()
                .map_err(|e| corrupt("status", e))?,
            description: row.description,
            image_url: row.image_url,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = SalesError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity)
            .ok()
            .and_then(|n| Quantity::new(n).ok())
            .ok_or_else(|| corrupt("quantity", row.quantity))?;
        Ok(Self {
            id: row.id.into(),
            exhibition_id: row.exhibition_id.into(),
            salesman_id: row.salesman_id.into(),
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            product_snapshot_id: row.product_snapshot_id.into(),
            product_name: row.product_name,
            product_sku: row.product_sku,
            product_price: money("product_price", row.product_price)?,
            quantity,
            total_amount: money("total_amount", row.total_amount)?,
            payment_ref: row.payment_ref,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_row(quantity: i64) -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            exhibition_id: Uuid::new_v4(),
            salesman_id: Uuid::new_v4(),
            customer_name: "Amit Sharma".into(),
            customer_phone: Some("9876543210".into()),
            customer_address: None,
            product_snapshot_id: Uuid::new_v4(),
            product_name: "Royal Oak Luxury Sofa".into(),
            product_sku: "SF-ROYAL-001".into(),
            product_price: 45_000,
            quantity,
            total_amount: 45_000 * quantity,
            payment_ref: "UPI-Transaction-001".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn order_row_converts() {
        let row = order_row(2);
        let id = row.id;
        let order = Order::try_from(row);
        assert!(matches!(order, Ok(ref o) if *o.id.as_uuid() == id && o.total_amount.units() == 90_000));
    }

    #[test]
    fn non_positive_quantity_is_corrupt() {
        assert!(matches!(
            Order::try_from(order_row(0)),
            Err(SalesError::Persistence(_))
        ));
        assert!(matches!(
            Order::try_from(order_row(-3)),
            Err(SalesError::Persistence(_))
        ));
    }

    #[test]
    fn unknown_role_is_corrupt() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "x".into(),
            password_hash: "h".into(),
            role: "ROOT".into(),
            is_active: true,
            assigned_exhibition_id: None,
            created_at: Utc::now(),
        };
        assert!(matches!(User::try_from(row), Err(SalesError::Persistence(_))));
    }
}
