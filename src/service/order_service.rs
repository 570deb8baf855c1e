//! Order capture and order listings.

use std::sync::Arc;

use super::views::order_views;
use crate::auth::SessionClaims;
use crate::domain::{
    Customer, ExhibitionId, Order, OrderFilter, OrderId, OrderView, ProductId, Quantity, Role,
};
use crate::error::SalesError;
use crate::persistence::Store;

/// Raw order input, as submitted by a salesman.
///
/// Everything is optional here so that absent fields can be reported
/// together; [`OrderService::create`] decides what is required.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    /// Target exhibition ID; defaults to the salesman's assignment.
    pub exhibition_id: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// ID of the product being sold.
    pub product_id: Option<String>,
    /// Units sold: a JSON integer or integer string.
    pub quantity: Option<serde_json::Value>,
    /// `"CASH"` or a payment transaction ID.
    pub payment_ref: Option<String>,
}

/// Validates and records orders; lists them scoped by role.
#[derive(Debug, Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    /// Creates a new `OrderService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Records an order for the calling salesman.
    ///
    /// Checks run in a fixed order and stop at the first failure: caller,
    /// exhibition, required fields, product, quantity, total. The product's
    /// name, SKU and price are copied onto the order and never re-read.
    ///
    /// # Errors
    ///
    /// - [`SalesError::Unauthorized`]: not a salesman, or the account is
    ///   gone or inactive.
    /// - [`SalesError::MissingExhibition`]: no exhibition given or assigned.
    /// - [`SalesError::ExhibitionNotFound`] / [`SalesError::ExhibitionNotLive`].
    /// - [`SalesError::MissingFields`]: blank customer name, product,
    ///   quantity or payment reference.
    /// - [`SalesError::ProductNotFound`]: unknown or inactive product.
    /// - [`SalesError::Validation`]: bad quantity or overflowing total.
    /// - [`SalesError::Persistence`]: the insert failed.
    pub async fn create(
        &self,
        session: &SessionClaims,
        draft: OrderDraft,
    ) -> Result<Order, SalesError> {
        session.require(Role::Salesman)?;
        let salesman = match self.store.user_by_id(session.id).await? {
            Some(user) if user.is_active && user.role == Role::Salesman => user,
            _ => {
                tracing::warn!(user = %session.id, "order refused: account missing or inactive");
                return Err(SalesError::Unauthorized);
            }
        };

        let exhibition_id = match text(draft.exhibition_id) {
            Some(raw) => ExhibitionId::parse(&raw).ok_or(SalesError::ExhibitionNotFound(raw))?,
            None => salesman
                .assigned_exhibition_id
                .ok_or(SalesError::MissingExhibition)?,
        };
        let exhibition = self
            .store
            .exhibition_by_id(exhibition_id)
            .await?
            .ok_or_else(|| SalesError::ExhibitionNotFound(exhibition_id.to_string()))?;
        if !exhibition.status.accepts_orders() {
            return Err(SalesError::ExhibitionNotLive {
                id: exhibition.id,
                status: exhibition.status,
            });
        }

        let customer_name = text(draft.customer_name);
        let payment_ref = text(draft.payment_ref);
        let product_ref = text(draft.product_id);
        let quantity = draft.quantity.filter(|q| !is_blank(q));
        let missing: Vec<String> = [
            ("customer_name", customer_name.is_none()),
            ("product_id", product_ref.is_none()),
            ("quantity", quantity.is_none()),
            ("payment_ref", payment_ref.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then(|| field.to_string()))
        .collect();
        let (Some(customer_name), Some(product_ref), Some(quantity), Some(payment_ref)) =
            (customer_name, product_ref, quantity, payment_ref)
        else {
            return Err(SalesError::MissingFields(missing));
        };

        let product = match ProductId::parse(&product_ref) {
            Some(id) => self.store.product_by_id(id).await?,
            None => None,
        }
        .filter(|p| p.is_active)
        .ok_or(SalesError::ProductNotFound(product_ref))?;
        let quantity = Quantity::coerce(&quantity)?;

        let customer = Customer {
            name: customer_name,
            phone: text(draft.customer_phone),
            address: text(draft.customer_address),
        };
        let order = Order::place(
            exhibition.id,
            salesman.id,
            customer,
            product.snapshot(),
            quantity,
            payment_ref,
        )?;
        self.store.insert_order(&order).await?;

        tracing::info!(
            order = %order.id,
            exhibition = %order.exhibition_id,
            salesman = %order.salesman_id,
            sku = %order.product_sku,
            quantity = %order.quantity,
            total = %order.total_amount,
            "order created"
        );
        Ok(order)
    }

    /// Orders visible to the caller, newest first.
    ///
    /// Admins see every order, optionally narrowed to one exhibition.
    /// Salesmen only ever see their own.
    ///
    /// # Errors
    ///
    /// [`SalesError::Persistence`] if the store is unavailable.
    pub async fn list_orders(
        &self,
        session: &SessionClaims,
        exhibition_id: Option<ExhibitionId>,
    ) -> Result<Vec<OrderView>, SalesError> {
        let filter = OrderFilter {
            exhibition_id,
            salesman_id: (!session.is_admin()).then_some(session.id),
        };
        let orders = self.store.list_orders(&filter).await?;
        order_views(self.store.as_ref(), orders).await
    }

    /// One order. Salesmen can only see their own.
    ///
    /// # Errors
    ///
    /// [`SalesError::OrderNotFound`] if absent or owned by another salesman.
    pub async fn get_order(
        &self,
        session: &SessionClaims,
        id: OrderId,
    ) -> Result<OrderView, SalesError> {
        let order = self
            .store
            .order_by_id(id)
            .await?
            .filter(|o| session.is_admin() || o.salesman_id == session.id)
            .ok_or(SalesError::OrderNotFound(id))?;
        order_views(self.store.as_ref(), vec![order])
            .await?
            .pop()
            .ok_or(SalesError::OrderNotFound(id))
    }
}

/// Trimmed text, `None` if absent or blank.
fn text(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(super::non_blank)
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{ExhibitionStatus, Money, Product, ProductPatch, User};
    use crate::service::testkit::{Fixture, claims};

    struct Shop {
        fx: Fixture,
        orders: OrderService,
        salesman: User,
        session: SessionClaims,
        expo: ExhibitionId,
        sofa: Product,
    }

    async fn shop() -> Shop {
        let fx = Fixture::new();
        let expo = fx.exhibition("Home Expo", ExhibitionStatus::Live).await;
        let mut salesman = fx.user("ravi", Role::Salesman).await;
        salesman.assigned_exhibition_id = Some(expo.id);
        let Ok(()) = fx.store.update_user(&salesman).await else {
            panic!("assign failed");
        };
        let sofa = fx.product("Royal Sofa", "SF-1", 5_000).await;
        Shop {
            orders: OrderService::new(fx.store()),
            session: claims(&salesman),
            salesman,
            expo: expo.id,
            sofa,
            fx,
        }
    }

    fn draft(product: ProductId, quantity: serde_json::Value) -> OrderDraft {
        OrderDraft {
            exhibition_id: None,
            customer_name: Some("Amit Sharma".into()),
            customer_phone: Some("9876543210".into()),
            customer_address: None,
            product_id: Some(product.to_string()),
            quantity: Some(quantity),
            payment_ref: Some("CASH".into()),
        }
    }

    async fn set_status(shop: &Shop, status: ExhibitionStatus) {
        let Ok(Some(mut expo)) = shop.fx.store.exhibition_by_id(shop.expo).await else {
            panic!("exhibition missing");
        };
        expo.status = status;
        let Ok(()) = shop.fx.store.update_exhibition(&expo).await else {
            panic!("status update failed");
        };
    }

    #[tokio::test]
    async fn live_order_freezes_price_and_computes_total() {
        let shop = shop().await;
        let Ok(order) = shop
            .orders
            .create(&shop.session, draft(shop.sofa.id, json!(3)))
            .await
        else {
            panic!("order should be created");
        };
        assert_eq!(order.total_amount.units(), 15_000);
        assert_eq!(order.product_price.units(), 5_000);
        assert_eq!(order.product_name, "Royal Sofa");
        assert_eq!(order.exhibition_id, shop.expo);
        assert_eq!(order.salesman_id, shop.salesman.id);
    }

    #[tokio::test]
    async fn string_quantity_is_coerced() {
        let shop = shop().await;
        let Ok(order) = shop
            .orders
            .create(&shop.session, draft(shop.sofa.id, json!("2")))
            .await
        else {
            panic!("order should be created");
        };
        assert_eq!(order.quantity.get(), 2);
    }

    #[tokio::test]
    async fn bad_quantities_are_rejected() {
        let shop = shop().await;
        for quantity in [json!(0), json!(-1), json!("abc"), json!(2.5), json!(true)] {
            assert!(
                matches!(
                    shop.orders
                        .create(&shop.session, draft(shop.sofa.id, quantity.clone()))
                        .await,
                    Err(SalesError::Validation(_))
                ),
                "{quantity} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn later_product_edits_do_not_touch_existing_orders() {
        let shop = shop().await;
        let Ok(first) = shop
            .orders
            .create(&shop.session, draft(shop.sofa.id, json!(1)))
            .await
        else {
            panic!("order should be created");
        };

        let mut sofa = shop.sofa.clone();
        sofa.apply(ProductPatch {
            name: Some("Budget Sofa".into()),
            base_price: Money::new(9_999).ok(),
            is_active: Some(false),
            ..ProductPatch::default()
        });
        let Ok(()) = shop.fx.store.update_product(&sofa).await else {
            panic!("product update failed");
        };

        assert!(matches!(
            shop.orders
                .create(&shop.session, draft(shop.sofa.id, json!(1)))
                .await,
            Err(SalesError::ProductNotFound(_))
        ));

        let Ok(view) = shop.orders.get_order(&shop.session, first.id).await else {
            panic!("order should still exist");
        };
        assert_eq!(view.order.product_price.units(), 5_000);
        assert_eq!(view.order.product_name, "Royal Sofa");
        assert_eq!(view.order.total_amount.units(), 5_000);
    }

    #[tokio::test]
    async fn non_live_exhibitions_refuse_orders() {
        let shop = shop().await;
        for status in [ExhibitionStatus::Planning, ExhibitionStatus::Closed] {
            set_status(&shop, status).await;
            assert!(matches!(
                shop.orders
                    .create(&shop.session, draft(shop.sofa.id, json!(1)))
                    .await,
                Err(SalesError::ExhibitionNotLive { .. })
            ));
        }
    }

    #[tokio::test]
    async fn exhibition_resolution() {
        let shop = shop().await;

        let mut explicit = draft(shop.sofa.id, json!(1));
        explicit.exhibition_id = Some(ExhibitionId::new().to_string());
        assert!(matches!(
            shop.orders.create(&shop.session, explicit).await,
            Err(SalesError::ExhibitionNotFound(_))
        ));

        let mut garbled = draft(shop.sofa.id, json!(1));
        garbled.exhibition_id = Some("expo-42".into());
        let Err(SalesError::ExhibitionNotFound(reference)) =
            shop.orders.create(&shop.session, garbled).await
        else {
            panic!("a malformed exhibition id names no exhibition");
        };
        assert_eq!(reference, "expo-42");

        let mut salesman = shop.salesman.clone();
        salesman.assigned_exhibition_id = None;
        let Ok(()) = shop.fx.store.update_user(&salesman).await else {
            panic!("unassign failed");
        };
        // The stale claims still name the old assignment; the store wins.
        assert!(matches!(
            shop.orders
                .create(&shop.session, draft(shop.sofa.id, json!(1)))
                .await,
            Err(SalesError::MissingExhibition)
        ));
    }

    #[tokio::test]
    async fn malformed_product_id_is_an_unknown_product() {
        let shop = shop().await;
        let mut garbled = draft(shop.sofa.id, json!(1));
        garbled.product_id = Some("not-a-uuid".into());
        let Err(SalesError::ProductNotFound(reference)) =
            shop.orders.create(&shop.session, garbled.clone()).await
        else {
            panic!("a malformed product id names no product");
        };
        assert_eq!(reference, "not-a-uuid");

        // The exhibition is checked before the product.
        set_status(&shop, ExhibitionStatus::Planning).await;
        assert!(matches!(
            shop.orders.create(&shop.session, garbled).await,
            Err(SalesError::ExhibitionNotLive { .. })
        ));
    }

    #[tokio::test]
    async fn missing_fields_are_listed_together() {
        let shop = shop().await;
        let incomplete = OrderDraft {
            customer_name: Some("   ".into()),
            quantity: Some(json!("")),
            ..OrderDraft::default()
        };
        let Err(SalesError::MissingFields(fields)) =
            shop.orders.create(&shop.session, incomplete).await
        else {
            panic!("expected missing fields");
        };
        assert_eq!(
            fields,
            ["customer_name", "product_id", "quantity", "payment_ref"]
        );
    }

    #[tokio::test]
    async fn only_active_salesmen_may_order() {
        let shop = shop().await;
        let admin = shop.fx.admin().await;
        assert!(matches!(
            shop.orders
                .create(&admin, draft(shop.sofa.id, json!(1)))
                .await,
            Err(SalesError::Unauthorized)
        ));

        let mut salesman = shop.salesman.clone();
        salesman.is_active = false;
        let Ok(()) = shop.fx.store.update_user(&salesman).await else {
            panic!("deactivate failed");
        };
        assert!(matches!(
            shop.orders
                .create(&shop.session, draft(shop.sofa.id, json!(1)))
                .await,
            Err(SalesError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn overflowing_total_is_rejected() {
        let shop = shop().await;
        let whale = shop.fx.product("Palace", "PL-1", i64::MAX / 2).await;
        assert!(matches!(
            shop.orders
                .create(&shop.session, draft(whale.id, json!(3)))
                .await,
            Err(SalesError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn listings_are_scoped_by_role() {
        let shop = shop().await;
        let mut other = shop.fx.user("sunil", Role::Salesman).await;
        other.assigned_exhibition_id = Some(shop.expo);
        let Ok(()) = shop.fx.store.update_user(&other).await else {
            panic!("assign failed");
        };
        let other_session = claims(&other);

        let Ok(mine) = shop
            .orders
            .create(&shop.session, draft(shop.sofa.id, json!(1)))
            .await
        else {
            panic!("order failed");
        };
        let Ok(theirs) = shop
            .orders
            .create(&other_session, draft(shop.sofa.id, json!(2)))
            .await
        else {
            panic!("order failed");
        };

        let Ok(own) = shop.orders.list_orders(&shop.session, None).await else {
            panic!("list failed");
        };
        assert_eq!(own.len(), 1);
        assert!(own.iter().all(|v| v.order.id == mine.id));
        assert!(own
            .iter()
            .all(|v| v.salesman_username.as_deref() == Some("ravi")
                && v.exhibition_name.as_deref() == Some("Home Expo")));

        let admin = shop.fx.admin().await;
        let Ok(all) = shop.orders.list_orders(&admin, Some(shop.expo)).await else {
            panic!("list failed");
        };
        assert_eq!(all.len(), 2);

        assert!(matches!(
            shop.orders.get_order(&shop.session, theirs.id).await,
            Err(SalesError::OrderNotFound(_))
        ));
        assert!(shop.orders.get_order(&admin, theirs.id).await.is_ok());
    }
}
