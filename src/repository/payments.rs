//! Payments repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::payment::Payment,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsRepository: Send + Sync {
    /// Payments whose borrowing belongs to `owner`, or all of them for `None`
    async fn list(&self, owner: Option<i32>) -> AppResult<Vec<Payment>>;
    async fn get_by_id(&self, id: i32, owner: Option<i32>) -> AppResult<Payment>;
    /// Pending → Paid; already paid rows are returned unchanged
    async fn mark_paid(&self, id: i32) -> AppResult<Payment>;
}

#[derive(Clone)]
pub struct PgPaymentsRepository {
    pool: Pool<Postgres>,
}

impl PgPaymentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentsRepository for PgPaymentsRepository {
    async fn list(&self, owner: Option<i32>) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.*
            FROM payments p
            JOIN borrowings b ON p.borrowing_id = b.id
            WHERE ($1::int IS NULL OR b.user_id = $1)
            ORDER BY p.id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    async fn get_by_id(&self, id: i32, owner: Option<i32>) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.*
            FROM payments p
            JOIN borrowings b ON p.borrowing_id = b.id
            WHERE p.id = $1 AND ($2::int IS NULL OR b.user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment with id {} not found", id)))
    }

    async fn mark_paid(&self, id: i32) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            "UPDATE payments SET status = 'Paid' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment with id {} not found", id)))
    }
}
