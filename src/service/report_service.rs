//! Revenue rollups: exhibition and salesman reports, the admin dashboard.
//!
//! Nothing here is cached or persisted. Every figure is recomputed from
//! the current order set through [`RevenueStats::from_orders`].

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::views::order_views;
use crate::auth::SessionClaims;
use crate::domain::report::top_products;
use crate::domain::{
    Exhibition, ExhibitionId, ExhibitionStatus, Money, OrderFilter, OrderView, ProductSales,
    ReportTable, RevenueStats, Role, User, UserId, UserProfile,
};
use crate::error::SalesError;
use crate::persistence::Store;

/// Orders shown on the dashboard.
pub const RECENT_ORDERS_LIMIT: usize = 5;

/// Everything sold at one exhibition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExhibitionReport {
    /// The exhibition.
    pub exhibition: Exhibition,
    /// Revenue rollup over all of its orders.
    pub stats: RevenueStats,
    /// Best-selling products by revenue.
    pub top_products: Vec<ProductSales>,
    /// Its orders, newest first.
    pub orders: Vec<OrderView>,
}

/// Everything one salesman sold.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesmanReport {
    /// The account.
    pub salesman: UserProfile,
    /// Current assignment, if any.
    pub assigned_exhibition: Option<Exhibition>,
    /// Revenue rollup over all of the salesman's orders.
    pub stats: RevenueStats,
    /// The salesman's orders, newest first.
    pub orders: Vec<OrderView>,
}

/// System-wide admin overview.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    /// Orders ever recorded.
    pub total_orders: u64,
    /// Exhibitions currently live.
    pub active_exhibitions: u64,
    /// Revenue over all orders.
    pub total_revenue: Money,
    /// The most recent orders.
    pub recent_orders: Vec<OrderView>,
}

/// Read-only aggregation over orders.
#[derive(Debug, Clone)]
pub struct ReportService {
    store: Arc<dyn Store>,
}

impl ReportService {
    /// Creates a new `ReportService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Report over one exhibition.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::ExhibitionNotFound`]
    /// if absent.
    pub async fn exhibition_report(
        &self,
        session: &SessionClaims,
        id: ExhibitionId,
    ) -> Result<ExhibitionReport, SalesError> {
        session.require(Role::Admin)?;
        let exhibition = self
            .store
            .exhibition_by_id(id)
            .await?
            .ok_or_else(|| SalesError::ExhibitionNotFound(id.to_string()))?;
        let orders = self
            .views(OrderFilter {
                exhibition_id: Some(id),
                ..OrderFilter::default()
            })
            .await?;
        let stats = RevenueStats::from_orders(orders.iter().map(|v| &v.order))?;
        let top_products = top_products(orders.iter().map(|v| &v.order))?;
        Ok(ExhibitionReport {
            exhibition,
            stats,
            top_products,
            orders,
        })
    }

    /// [`Self::exhibition_report`] as a table of its orders.
    ///
    /// # Errors
    ///
    /// As [`Self::exhibition_report`].
    pub async fn exhibition_table(
        &self,
        session: &SessionClaims,
        id: ExhibitionId,
    ) -> Result<ReportTable, SalesError> {
        let report = self.exhibition_report(session, id).await?;
        Ok(ReportTable::exhibition_orders(
            format!("Exhibition Report: {}", report.exhibition.name),
            &report.orders,
        ))
    }

    /// Report over one salesman.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin, [`SalesError::UserNotFound`]
    /// if there is no salesman with this ID.
    pub async fn salesman_report(
        &self,
        session: &SessionClaims,
        id: UserId,
    ) -> Result<SalesmanReport, SalesError> {
        session.require(Role::Admin)?;
        let salesman = self
            .store
            .user_by_id(id)
            .await?
            .filter(|u| u.role == Role::Salesman)
            .ok_or(SalesError::UserNotFound(id))?;
        self.report_for(&salesman).await
    }

    /// [`Self::salesman_report`] as a table of the salesman's orders.
    ///
    /// # Errors
    ///
    /// As [`Self::salesman_report`].
    pub async fn salesman_table(
        &self,
        session: &SessionClaims,
        id: UserId,
    ) -> Result<ReportTable, SalesError> {
        let report = self.salesman_report(session, id).await?;
        Ok(ReportTable::salesman_orders(
            format!("Salesman Report: {}", report.salesman.username),
            &report.orders,
        ))
    }

    /// The calling salesman's own report.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless a salesman whose account still
    /// exists and is active.
    pub async fn my_report(&self, session: &SessionClaims) -> Result<SalesmanReport, SalesError> {
        session.require(Role::Salesman)?;
        let salesman = self
            .store
            .user_by_id(session.id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(SalesError::Unauthorized)?;
        self.report_for(&salesman).await
    }

    /// System-wide totals and the most recent orders.
    ///
    /// # Errors
    ///
    /// [`SalesError::Unauthorized`] unless admin.
    pub async fn system_dashboard(&self, session: &SessionClaims) -> Result<Dashboard, SalesError> {
        session.require(Role::Admin)?;
        let orders = self.store.list_orders(&OrderFilter::default()).await?;
        let stats = RevenueStats::from_orders(&orders)?;
        let active = self
            .store
            .list_exhibitions(Some(ExhibitionStatus::Live))
            .await?
            .len();
        let recent = orders.into_iter().take(RECENT_ORDERS_LIMIT).collect();

        Ok(Dashboard {
            total_orders: stats.total_orders,
            active_exhibitions: u64::try_from(active).unwrap_or(u64::MAX),
            total_revenue: stats.total_revenue,
            recent_orders: order_views(self.store.as_ref(), recent).await?,
        })
    }

    async fn report_for(&self, salesman: &User) -> Result<SalesmanReport, SalesError> {
        let assigned_exhibition = match salesman.assigned_exhibition_id {
            Some(id) => self.store.exhibition_by_id(id).await?,
            None => None,
        };
        let orders = self
            .views(OrderFilter {
                salesman_id: Some(salesman.id),
                ..OrderFilter::default()
            })
            .await?;
        let stats = RevenueStats::from_orders(orders.iter().map(|v| &v.order))?;
        Ok(SalesmanReport {
            salesman: UserProfile::from(salesman),
            assigned_exhibition,
            stats,
            orders,
        })
    }

    async fn views(&self, filter: OrderFilter) -> Result<Vec<OrderView>, SalesError> {
        let orders = self.store.list_orders(&filter).await?;
        order_views(self.store.as_ref(), orders).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{CellValue, Product};
    use crate::service::testkit::{Fixture, claims};
    use crate::service::{OrderDraft, OrderService};

    struct World {
        fx: Fixture,
        reports: ReportService,
        orders: OrderService,
        admin: SessionClaims,
        ravi: SessionClaims,
        ravi_id: UserId,
        expo: Exhibition,
    }

    async fn world() -> World {
        let fx = Fixture::new();
        let admin = fx.admin().await;
        let expo = fx.exhibition("Home Expo", ExhibitionStatus::Live).await;
        let mut ravi = fx.user("ravi", Role::Salesman).await;
        ravi.assigned_exhibition_id = Some(expo.id);
        let Ok(()) = fx.store.update_user(&ravi).await else {
            panic!("assign failed");
        };
        World {
            reports: ReportService::new(fx.store()),
            orders: OrderService::new(fx.store()),
            admin,
            ravi: claims(&ravi),
            ravi_id: ravi.id,
            expo,
            fx,
        }
    }

    async fn sell(w: &World, session: &SessionClaims, product: &Product, qty: u32) {
        let draft = OrderDraft {
            customer_name: Some("Priya".into()),
            product_id: Some(product.id.to_string()),
            quantity: Some(json!(qty)),
            payment_ref: Some("UPI-1".into()),
            ..OrderDraft::default()
        };
        let Ok(_) = w.orders.create(session, draft).await else {
            panic!("sale failed");
        };
    }

    async fn close(w: &World) {
        let mut expo = w.expo.clone();
        expo.status = ExhibitionStatus::Closed;
        let Ok(()) = w.fx.store.update_exhibition(&expo).await else {
            panic!("close failed");
        };
    }

    #[tokio::test]
    async fn empty_exhibition_reports_zero() {
        let w = world().await;
        let Ok(report) = w.reports.exhibition_report(&w.admin, w.expo.id).await else {
            panic!("report failed");
        };
        assert_eq!(report.stats, RevenueStats::default());
        assert!(report.orders.is_empty());
        assert!(report.top_products.is_empty());
    }

    #[tokio::test]
    async fn closed_exhibition_still_reports_prior_orders() {
        let w = world().await;
        let sofa = w.fx.product("Sofa", "SF-1", 5_000).await;
        let lamp = w.fx.product("Lamp", "LP-1", 1_200).await;
        sell(&w, &w.ravi, &sofa, 3).await;
        sell(&w, &w.ravi, &lamp, 1).await;
        close(&w).await;

        let Ok(report) = w.reports.exhibition_report(&w.admin, w.expo.id).await else {
            panic!("report failed");
        };
        assert_eq!(report.exhibition.status, ExhibitionStatus::Closed);
        assert_eq!(report.stats.total_revenue.units(), 16_200);
        assert_eq!(report.stats.total_orders, 2);
        assert_eq!(report.stats.avg_order_value.units(), 8_100);
        let skus: Vec<&str> = report.top_products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, ["SF-1", "LP-1"]);
        assert!(report
            .orders
            .iter()
            .all(|v| v.salesman_username.as_deref() == Some("ravi")));
    }

    #[tokio::test]
    async fn dashboard_and_reports_agree() {
        let w = world().await;
        let sofa = w.fx.product("Sofa", "SF-1", 5_000).await;
        for qty in 1..=7 {
            sell(&w, &w.ravi, &sofa, qty).await;
        }

        let Ok(dashboard) = w.reports.system_dashboard(&w.admin).await else {
            panic!("dashboard failed");
        };
        let Ok(by_expo) = w.reports.exhibition_report(&w.admin, w.expo.id).await else {
            panic!("report failed");
        };
        let Ok(by_salesman) = w.reports.salesman_report(&w.admin, w.ravi_id).await else {
            panic!("report failed");
        };

        assert_eq!(dashboard.total_orders, 7);
        assert_eq!(dashboard.active_exhibitions, 1);
        assert_eq!(dashboard.total_revenue.units(), 5_000 * 28);
        assert_eq!(dashboard.recent_orders.len(), RECENT_ORDERS_LIMIT);
        assert_eq!(dashboard.total_revenue, by_expo.stats.total_revenue);
        assert_eq!(by_expo.stats, by_salesman.stats);
        assert_eq!(by_salesman.assigned_exhibition.map(|e| e.id), Some(w.expo.id));
    }

    #[tokio::test]
    async fn salesman_sees_only_own_report() {
        let w = world().await;
        let sofa = w.fx.product("Sofa", "SF-1", 5_000).await;
        sell(&w, &w.ravi, &sofa, 2).await;

        let Ok(mine) = w.reports.my_report(&w.ravi).await else {
            panic!("own report failed");
        };
        assert_eq!(mine.salesman.id, w.ravi_id);
        assert_eq!(mine.stats.total_revenue.units(), 10_000);

        assert!(matches!(
            w.reports.salesman_report(&w.ravi, w.ravi_id).await,
            Err(SalesError::Unauthorized)
        ));
        assert!(matches!(
            w.reports.system_dashboard(&w.ravi).await,
            Err(SalesError::Unauthorized)
        ));
        assert!(matches!(
            w.reports.my_report(&w.admin).await,
            Err(SalesError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn deactivated_salesman_loses_own_report_but_admin_keeps_it() {
        let w = world().await;
        let sofa = w.fx.product("Sofa", "SF-1", 5_000).await;
        sell(&w, &w.ravi, &sofa, 1).await;

        let Ok(Some(mut ravi)) = w.fx.store.user_by_id(w.ravi_id).await else {
            panic!("salesman missing");
        };
        ravi.is_active = false;
        let Ok(()) = w.fx.store.update_user(&ravi).await else {
            panic!("deactivate failed");
        };

        // The token issued before deactivation still verifies.
        assert!(matches!(
            w.reports.my_report(&w.ravi).await,
            Err(SalesError::Unauthorized)
        ));
        let Ok(report) = w.reports.salesman_report(&w.admin, w.ravi_id).await else {
            panic!("admin report failed");
        };
        assert!(!report.salesman.is_active);
        assert_eq!(report.stats.total_orders, 1);
    }

    #[tokio::test]
    async fn unknown_subjects_are_not_found() {
        let w = world().await;
        assert!(matches!(
            w.reports.exhibition_report(&w.admin, ExhibitionId::new()).await,
            Err(SalesError::ExhibitionNotFound(_))
        ));
        assert!(matches!(
            w.reports.salesman_report(&w.admin, w.admin.id).await,
            Err(SalesError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn tables_carry_typed_cells() {
        let w = world().await;
        let sofa = w.fx.product("Sofa", "SF-1", 5_000).await;
        sell(&w, &w.ravi, &sofa, 3).await;

        let Ok(table) = w.reports.exhibition_table(&w.admin, w.expo.id).await else {
            panic!("table failed");
        };
        assert_eq!(table.title, "Exhibition Report: Home Expo");
        assert_eq!(table.rows.len(), 1);
        assert!(table
            .rows
            .iter()
            .flatten()
            .any(|cell| *cell == CellValue::Money(Money::new(15_000).unwrap_or_default())));

        let Ok(table) = w.reports.salesman_table(&w.admin, w.ravi_id).await else {
            panic!("table failed");
        };
        assert_eq!(table.title, "Salesman Report: ravi");
        assert!(table.rows.iter().all(|row| row.len() == table.columns.len()));
    }
}
