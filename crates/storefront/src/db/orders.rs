//! Order repository: the `PostgreSQL` order store.
//!
//! Orders are inserted once and never updated. The unique index on
//! `idempotency_key` turns a retried submission into a lookup of the
//! order that was already written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use sweet_treats_core::{
    LineItem, NewOrder, Order, OrderId, OrderStore, OrderStoreError, PaymentMethod, Price, UserId,
};

use super::RepositoryError;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: Option<i32>,
    full_name: String,
    address: String,
    contact: String,
    total_amount: Decimal,
    payment_method: String,
    items: Json<Vec<LineItem>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let total_amount = Price::new(row.total_amount).map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;
        let payment_method = row
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", row.id)))?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            full_name: row.full_name,
            address: row.address,
            contact: row.contact,
            total_amount,
            payment_method,
            items: row.items.0,
            created_at: row.created_at,
        })
    }
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order, or return the ID of the order already stored under
    /// the same idempotency key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[tracing::instrument(skip(self, order), fields(idempotency_key = %order.idempotency_key))]
    pub async fn insert(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let inserted: Option<i32> = sqlx::query_scalar(
            r"
            INSERT INTO orders
                (idempotency_key, user_id, full_name, address, contact,
                 total_amount, payment_method, items)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING id
            ",
        )
        .bind(order.idempotency_key)
        .bind(order.user_id)
        .bind(&order.full_name)
        .bind(&order.address)
        .bind(&order.contact)
        .bind(order.total_amount)
        .bind(order.payment_method.as_str())
        .bind(Json(&order.items))
        .fetch_optional(self.pool)
        .await?;

        if let Some(id) = inserted {
            return Ok(OrderId::new(id));
        }

        let existing: i32 = sqlx::query_scalar("SELECT id FROM orders WHERE idempotency_key = $1")
            .bind(order.idempotency_key)
            .fetch_one(self.pool)
            .await?;
        tracing::warn!(order_id = existing, "Duplicate order submission; returning stored order");
        Ok(OrderId::new(existing))
    }

    /// Orders placed by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, full_name, address, contact,
                   total_amount, payment_method, items, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}

impl OrderStore for OrderRepository<'_> {
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderId, OrderStoreError> {
        self.insert(order).await.map_err(OrderStoreError::new)
    }
}
