use std::collections::HashMap;

use crate::data::constraint_of;
use crate::domain::error::DomainError;
use crate::domain::order::{Customer, NewOrder, Order, OrderPatch, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    /// Orders placed by `user_id`, newest first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError>;
    /// Orders whose status is one of `statuses`, oldest first.
    async fn find_by_statuses(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DomainError>;
    async fn update(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, DomainError>;
    /// Number of orders per delivery-time label among those placed within
    /// `[start, end]`.
    async fn count_by_delivery_time(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, i64>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: Option<i64>,
    order_date: DateTime<Utc>,
    delivery_time: Option<String>,
    total_amount: Option<Decimal>,
    order_details: Option<String>,
    status: String,
    user_email: Option<String>,
    user_first_name: Option<String>,
    user_last_name: Option<String>,
    user_address: Option<String>,
    user_city: Option<String>,
    user_phone: Option<String>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            DomainError::Internal(format!("order {} has unknown status {}", row.id, row.status))
        })?;
        let user = match (row.user_id, row.user_email) {
            (Some(id), Some(email)) => Some(Customer {
                id,
                email,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                address: row.user_address,
                city: row.user_city,
                phone: row.user_phone,
            }),
            _ => None,
        };
        Ok(Self {
            id: row.id,
            user,
            order_date: row.order_date,
            delivery_time: row.delivery_time,
            total_amount: row.total_amount,
            order_details: row.order_details,
            status,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    rows.into_iter().map(Order::try_from).collect()
}

const ORDER_COLUMNS: &str = r#"
    o.id, o.user_id, o.order_date, o.delivery_time, o.total_amount, o.order_details, o.status,
    u.email AS user_email, u.first_name AS user_first_name, u.last_name AS user_last_name,
    u.address AS user_address, u.city AS user_city, u.phone AS user_phone
"#;

#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let sql = format!(
            r#"
            WITH o AS (
                INSERT INTO orders
                    (user_id, order_date, delivery_time, total_amount, order_details, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {ORDER_COLUMNS} FROM o LEFT JOIN users u ON u.id = o.user_id
            "#
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.user_id)
            .bind(order.order_date)
            .bind(&order.delivery_time)
            .bind(order.total_amount)
            .bind(&order.order_details)
            .bind(order.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match order.user_id {
                Some(user_id) if constraint_of(&e) == Some("orders_user_id_fkey") => {
                    DomainError::UserNotFound(user_id)
                }
                _ => {
                    error!("failed to create order: {}", e);
                    DomainError::Internal(format!("database error: {}", e))
                }
            })?;

        info!(
            order_id = row.id,
            user_id = ?row.user_id,
            delivery_time = ?row.delivery_time,
            "order created"
        );
        row.try_into()
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id
             WHERE o.user_id = $1 ORDER BY o.order_date DESC, o.id DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching orders of user {}: {}", user_id, e);
                DomainError::Internal(e.to_string())
            })?;
        into_orders(rows)
    }

    async fn find_by_statuses(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DomainError> {
        let labels: Vec<&str> = statuses.iter().map(OrderStatus::as_str).collect();
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id
             WHERE o.status = ANY($1) ORDER BY o.order_date ASC, o.id ASC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(labels)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching orders by status: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        into_orders(rows)
    }

    async fn update(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, DomainError> {
        let sql = format!(
            r#"
            WITH o AS (
                UPDATE orders
                SET status = COALESCE($1, status),
                    delivery_time = COALESCE($2, delivery_time)
                WHERE id = $3
                RETURNING *
            )
            SELECT {ORDER_COLUMNS} FROM o LEFT JOIN users u ON u.id = o.user_id
            "#
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(patch.status.map(|s| s.as_str()))
            .bind(&patch.delivery_time)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to update order {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        match row {
            Some(row) => {
                info!(order_id = id, status = %row.status, "order updated");
                row.try_into().map(Some)
            }
            None => Ok(None),
        }
    }

    async fn count_by_delivery_time(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, i64>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT delivery_time, COUNT(*)
            FROM orders
            WHERE delivery_time IS NOT NULL
              AND order_date BETWEEN $1 AND $2
            GROUP BY delivery_time
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while counting slot bookings: {}", e);
            DomainError::Internal(e.to_string())
        })?;
        Ok(rows.into_iter().collect())
    }
}
