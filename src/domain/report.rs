//! Revenue rollups and format-agnostic report tables.
//!
//! Every view that shows revenue (dashboard, exhibition report, salesman
//! report) goes through [`RevenueStats::from_orders`], so the figures
//! cannot drift apart between screens.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Money, Order};
use crate::error::SalesError;

/// Maximum number of entries in a top-products ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Revenue, order count and average order value over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenueStats {
    /// Sum of `total_amount`.
    pub total_revenue: Money,
    /// Number of orders.
    pub total_orders: u64,
    /// `total_revenue / total_orders`, rounded half-up; 0 with no orders.
    pub avg_order_value: Money,
}

impl RevenueStats {
    /// Folds a set of orders. Order of iteration does not matter.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Internal`] if the revenue exceeds the money
    /// range.
    pub fn from_orders<'a, I>(orders: I) -> Result<Self, SalesError>
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let (sum, count) = orders
            .into_iter()
            .fold((0i128, 0u64), |(sum, count), order| {
                (
                    sum + i128::from(order.total_amount.units()),
                    count.saturating_add(1),
                )
            });

        let total_revenue = to_money(sum)?;
        let avg_order_value = if count == 0 {
            Money::ZERO
        } else {
            let count = i128::from(count);
            to_money((2 * sum + count) / (2 * count))?
        };

        Ok(Self {
            total_revenue,
            total_orders: count,
            avg_order_value,
        })
    }
}

fn to_money(units: i128) -> Result<Money, SalesError> {
    i64::try_from(units)
        .map_err(|_| SalesError::Internal("revenue exceeds representable range".to_string()))
        .and_then(Money::new)
}

/// Units and revenue of one product within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductSales {
    /// SKU frozen on the orders.
    pub sku: String,
    /// Name frozen on the most recent order.
    pub name: String,
    /// Units sold.
    pub units_sold: u64,
    /// Revenue from those units.
    pub revenue: Money,
}

/// Ranks products by revenue (then units, then name), grouping orders by
/// their frozen SKU. Returns at most [`TOP_PRODUCTS_LIMIT`] entries.
///
/// # Errors
///
/// Returns [`SalesError::Internal`] if a product's revenue overflows.
pub fn top_products<'a, I>(orders: I) -> Result<Vec<ProductSales>, SalesError>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut by_sku: HashMap<&str, (&Order, u64, i128)> = HashMap::new();
    for order in orders {
        let entry = by_sku
            .entry(order.product_sku.as_str())
            .or_insert((order, 0, 0));
        if order.created_at > entry.0.created_at {
            entry.0 = order;
        }
        entry.1 = entry.1.saturating_add(u64::from(order.quantity.get()));
        entry.2 += i128::from(order.total_amount.units());
    }

    let mut ranked = by_sku
        .into_values()
        .map(|(latest, units_sold, revenue)| {
            Ok(ProductSales {
                sku: latest.product_sku.clone(),
                name: latest.product_name.clone(),
                units_sold,
                revenue: to_money(revenue)?,
            })
        })
        .collect::<Result<Vec<_>, SalesError>>()?;

    ranked.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then(b.units_sold.cmp(&a.units_sold))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(TOP_PRODUCTS_LIMIT);
    Ok(ranked)
}

/// An order with the display names of its salesman and exhibition joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderView {
    /// The order record.
    #[serde(flatten)]
    pub order: Order,
    /// Username of the salesman, if the account still resolves.
    pub salesman_username: Option<String>,
    /// Name of the exhibition, if it still resolves.
    pub exhibition_name: Option<String>,
}

/// Column header of a [`ReportTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportColumn {
    /// Stable machine key.
    pub key: String,
    /// Human-readable header.
    pub label: String,
}

/// A typed table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Money amount.
    Money(Money),
    /// Point in time.
    Timestamp(DateTime<Utc>),
}

/// Ordered columns plus typed rows, ready for any presentation layer
/// (CSV, PDF, spreadsheet) to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportTable {
    /// Table title.
    pub title: String,
    /// Column headers, in display order.
    pub columns: Vec<ReportColumn>,
    /// One row per record; each row has one cell per column.
    pub rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    fn with_columns(title: String, columns: &[(&str, &str)]) -> Self {
        Self {
            title,
            columns: columns
                .iter()
                .map(|(key, label)| ReportColumn {
                    key: (*key).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Table of an exhibition's orders.
    #[must_use]
    pub fn exhibition_orders(title: String, orders: &[OrderView]) -> Self {
        let mut table = Self::with_columns(
            title,
            &[
                ("order_id", "Order ID"),
                ("created_at", "Date"),
                ("customer_name", "Customer Name"),
                ("customer_phone", "Phone"),
                ("product_name", "Product"),
                ("quantity", "Quantity"),
                ("total_amount", "Amount"),
                ("salesman", "Salesman"),
                ("payment_ref", "Payment Ref"),
            ],
        );
        table.rows = orders
            .iter()
            .map(|view| {
                let o = &view.order;
                vec![
                    CellValue::Text(o.id.to_string()),
                    CellValue::Timestamp(o.created_at),
                    CellValue::Text(o.customer_name.clone()),
                    CellValue::Text(o.customer_phone.clone().unwrap_or_default()),
                    CellValue::Text(o.product_name.clone()),
                    CellValue::Integer(i64::from(o.quantity.get())),
                    CellValue::Money(o.total_amount),
                    CellValue::Text(
                        view.salesman_username
                            .clone()
                            .unwrap_or_else(|| "Unknown".to_string()),
                    ),
                    CellValue::Text(o.payment_ref.clone()),
                ]
            })
            .collect();
        table
    }

    /// Table of a salesman's orders.
    #[must_use]
    pub fn salesman_orders(title: String, orders: &[OrderView]) -> Self {
        let mut table = Self::with_columns(
            title,
            &[
                ("created_at", "Date"),
                ("customer_name", "Customer"),
                ("product_name", "Product"),
                ("quantity", "Quantity"),
                ("total_amount", "Amount"),
                ("exhibition", "Exhibition"),
            ],
        );
        table.rows = orders
            .iter()
            .map(|view| {
                let o = &view.order;
                vec![
                    CellValue::Timestamp(o.created_at),
                    CellValue::Text(o.customer_name.clone()),
                    CellValue::Text(o.product_name.clone()),
                    CellValue::Integer(i64::from(o.quantity.get())),
                    CellValue::Money(o.total_amount),
                    CellValue::Text(view.exhibition_name.clone().unwrap_or_default()),
                ]
            })
            .collect();
        table
    }
}
