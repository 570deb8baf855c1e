//! PostgreSQL implementation of the persistence layer.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::Store;
use super::models::{ExhibitionRow, OrderRow, ProductRow, UserRow};
use crate::config::ServerConfig;
use crate::domain::{
    Exhibition, ExhibitionId, ExhibitionStatus, Order, OrderFilter, OrderId, Product, ProductId,
    Role, User, UserId,
};
use crate::error::SalesError;

const USER_SELECT: &str = "SELECT id, username, password_hash, role, is_active, \
     assigned_exhibition_id, created_at FROM users";

const PRODUCT_SELECT: &str =
    "SELECT id, name, sku, base_price, image_url, is_active, created_at FROM products";

const EXHIBITION_SELECT: &str = "SELECT id, name, city, start_date, end_date, status, \
     description, image_url, created_at FROM exhibitions";

const ORDER_SELECT: &str = "SELECT id, exhibition_id, salesman_id, customer_name, \
     customer_phone, customer_address, product_snapshot_id, product_name, product_sku, \
     product_price, quantity, total_amount, payment_ref, created_at FROM orders";

const ORDER_WHERE: &str = "WHERE ($1::uuid IS NULL OR exhibition_id = $1) \
     AND ($2::uuid IS NULL OR salesman_id = $2)";

/// PostgreSQL-backed [`Store`] using `sqlx::PgPool`.
///
/// Every query runs under `query_timeout`; an elapsed timeout surfaces as
/// [`SalesError::Persistence`] and is never retried here.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Opens a connection pool using the database settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Persistence`] if the database is unreachable.
    pub async fn connect(config: &ServerConfig) -> Result<Self, SalesError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(db_error)?;
        Ok(Self::new(
            pool,
            Duration::from_secs(config.database_query_timeout_secs),
        ))
    }

    /// Applies the embedded migrations under `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), SalesError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SalesError::Persistence(format!("migration failed: {e}")))
    }

    async fn run<T, F>(&self, fut: F) -> Result<T, SalesError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        self.run_with(fut, db_error).await
    }

    async fn run_with<T, F, M>(&self, fut: F, map_err: M) -> Result<T, SalesError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
        M: FnOnce(sqlx::Error) -> SalesError,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| {
                SalesError::Persistence(format!(
                    "query timed out after {} ms",
                    self.query_timeout.as_millis()
                ))
            })?
            .map_err(map_err)
    }
}

fn db_error(e: sqlx::Error) -> SalesError {
    SalesError::Persistence(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, SalesError>
where
    T: TryFrom<R, Error = SalesError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl Store for PostgresStore {
    async fn insert_user(&self, user: &User) -> Result<(), SalesError> {
        let username = user.username.clone();
        self.run_with(
            sqlx::query(
                "INSERT INTO users (id, username, password_hash, role, is_active, \
                 assigned_exhibition_id, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::from(user.id))
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.assigned_exhibition_id.map(Uuid::from))
            .bind(user.created_at)
            .execute(&self.pool),
            |e| {
                if is_unique_violation(&e) {
                    SalesError::DuplicateUsername(username)
                } else {
                    db_error(e)
                }
            },
        )
        .await?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), SalesError> {
        let result = self
            .run(
                sqlx::query(
                    "UPDATE users SET password_hash = $2, role = $3, is_active = $4, \
                     assigned_exhibition_id = $5 WHERE id = $1",
                )
                .bind(Uuid::from(user.id))
                .bind(&user.password_hash)
                .bind(user.role.as_str())
                .bind(user.is_active)
                .bind(user.assigned_exhibition_id.map(Uuid::from))
                .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(SalesError::UserNotFound(user.id));
        }
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, SalesError> {
        let sql = format!("{USER_SELECT} WHERE id = $1");
        self.run(
            sqlx::query_as::<_, UserRow>(&sql)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool),
        )
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, SalesError> {
        let sql = format!("{USER_SELECT} WHERE username = $1");
        self.run(
            sqlx::query_as::<_, UserRow>(&sql)
                .bind(username)
                .fetch_optional(&self.pool),
        )
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, SalesError> {
        let sql = format!(
            "{USER_SELECT} WHERE ($1::text IS NULL OR role = $1) ORDER BY created_at DESC"
        );
        let rows = self
            .run(
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(role.map(Role::as_str))
                    .fetch_all(&self.pool),
            )
            .await?;
        convert_all(rows)
    }

    async fn users_assigned_to(&self, exhibition: ExhibitionId) -> Result<Vec<User>, SalesError> {
        let sql = format!("{USER_SELECT} WHERE assigned_exhibition_id = $1 ORDER BY username");
        let rows = self
            .run(
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(Uuid::from(exhibition))
                    .fetch_all(&self.pool),
            )
            .await?;
        convert_all(rows)
    }

    async fn insert_product(&self, product: &Product) -> Result<(), SalesError> {
        let sku = product.sku.clone();
        self.run_with(
            sqlx::query(
                "INSERT INTO products (id, name, sku, base_price, image_url, is_active, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::from(product.id))
            .bind(&product.name)
            .bind(&product.sku)
            .bind(product.base_price.units())
            .bind(&product.image_url)
            .bind(product.is_active)
            .bind(product.created_at)
            .execute(&self.pool),
            |e| {
                if is_unique_violation(&e) {
                    SalesError::DuplicateSku(sku)
                } else {
                    db_error(e)
                }
            },
        )
        .await?;
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), SalesError> {
        let sku = product.sku.clone();
        let result = self
            .run_with(
                sqlx::query(
                    "UPDATE products SET name = $2, sku = $3, base_price = $4, image_url = $5, \
                     is_active = $6 WHERE id = $1",
                )
                .bind(Uuid::from(product.id))
                .bind(&product.name)
                .bind(&product.sku)
                .bind(product.base_price.units())
                .bind(&product.image_url)
                .bind(product.is_active)
                .execute(&self.pool),
                |e| {
                    if is_unique_violation(&e) {
                        SalesError::DuplicateSku(sku)
                    } else {
                        db_error(e)
                    }
                },
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(SalesError::ProductNotFound(product.id.to_string()));
        }
        Ok(())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, SalesError> {
        let sql = format!("{PRODUCT_SELECT} WHERE id = $1");
        self.run(
            sqlx::query_as::<_, ProductRow>(&sql)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool),
        )
        .await?
        .map(Product::try_from)
        .transpose()
    }

    async fn list_products(&self, active_only: bool) -> Result<Vec<Product>, SalesError> {
        let sql = format!("{PRODUCT_SELECT} WHERE ($1 = FALSE OR is_active) ORDER BY name ASC");
        let rows = self
            .run(
                sqlx::query_as::<_, ProductRow>(&sql)
                    .bind(active_only)
                    .fetch_all(&self.pool),
            )
            .await?;
        convert_all(rows)
    }

    async fn insert_exhibition(&self, exhibition: &Exhibition) -> Result<(), SalesError> {
        self.run(
            sqlx::query(
                "INSERT INTO exhibitions (id, name, city, start_date, end_date, status, \
                 description, image_url, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(Uuid::from(exhibition.id))
            .bind(&exhibition.name)
            .bind(&exhibition.city)
            .bind(exhibition.start_date)
            .bind(exhibition.end_date)
            .bind(exhibition.status.as_str())
            .bind(&exhibition.description)
            .bind(&exhibition.image_url)
            .bind(exhibition.created_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn update_exhibition(&self, exhibition: &Exhibition) -> Result<(), SalesError> {
        let result = self
            .run(
                sqlx::query(
                    "UPDATE exhibitions SET name = $2, city = $3, start_date = $4, end_date = $5, \
                     status = $6, description = $7, image_url = $8 WHERE id = $1",
                )
                .bind(Uuid::from(exhibition.id))
                .bind(&exhibition.name)
                .bind(&exhibition.city)
                .bind(exhibition.start_date)
                .bind(exhibition.end_date)
                .bind(exhibition.status.as_str())
                .bind(&exhibition.description)
                .bind(&exhibition.image_url)
                .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(SalesError::ExhibitionNotFound(exhibition.id.to_string()));
        }
        Ok(())
    }

    async fn exhibition_by_id(&self, id: ExhibitionId) -> Result<Option<Exhibition>, SalesError> {
        let sql = format!("{EXHIBITION_SELECT} WHERE id = $1");
        self.run(
            sqlx::query_as::<_, ExhibitionRow>(&sql)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool),
        )
        .await?
        .map(Exhibition::try_from)
        .transpose()
    }

    async fn list_exhibitions(
        &self,
        status: Option<ExhibitionStatus>,
    ) -> Result<Vec<Exhibition>, SalesError> {
        let sql = format!(
            "{EXHIBITION_SELECT} WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY start_date DESC, created_at DESC"
        );
        let rows = self
            .run(
                sqlx::query_as::<_, ExhibitionRow>(&sql)
                    .bind(status.map(ExhibitionStatus::as_str))
                    .fetch_all(&self.pool),
            )
            .await?;
        convert_all(rows)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), SalesError> {
        self.run(
            sqlx::query(
                "INSERT INTO orders (id, exhibition_id, salesman_id, customer_name, customer_phone, \
                 customer_address, product_snapshot_id, product_name, product_sku, product_price, \
                 quantity, total_amount, payment_ref, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            )
            .bind(Uuid::from(order.id))
            .bind(Uuid::from(order.exhibition_id))
            .bind(Uuid::from(order.salesman_id))
            .bind(&order.customer_name)
            .bind(&order.customer_phone)
            .bind(&order.customer_address)
            .bind(Uuid::from(order.product_snapshot_id))
            .bind(&order.product_name)
            .bind(&order.product_sku)
            .bind(order.product_price.units())
            .bind(i64::from(order.quantity.get()))
            .bind(order.total_amount.units())
            .bind(&order.payment_ref)
            .bind(order.created_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, SalesError> {
        let sql = format!("{ORDER_SELECT} WHERE id = $1");
        self.run(
            sqlx::query_as::<_, OrderRow>(&sql)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool),
        )
        .await?
        .map(Order::try_from)
        .transpose()
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, SalesError> {
        let sql = format!("{ORDER_SELECT} {ORDER_WHERE} ORDER BY created_at DESC");
        let rows = self
            .run(
                sqlx::query_as::<_, OrderRow>(&sql)
                    .bind(filter.exhibition_id.map(Uuid::from))
                    .bind(filter.salesman_id.map(Uuid::from))
                    .fetch_all(&self.pool),
            )
            .await?;
        convert_all(rows)
    }

    async fn count_orders(&self, filter: &OrderFilter) -> Result<u64, SalesError> {
        let sql = format!("SELECT COUNT(*) FROM orders {ORDER_WHERE}");
        let count = self
            .run(
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(filter.exhibition_id.map(Uuid::from))
                    .bind(filter.salesman_id.map(Uuid::from))
                    .fetch_one(&self.pool),
            )
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
