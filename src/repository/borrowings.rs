//! Borrowings repository for database operations
//!
//! Inventory only moves inside the transactions opened here: a conditional
//! decrement when a borrowing is created, and an increment gated on the
//! `actual_return_date` null → set transition of a locked borrowing row.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::{
            rental_fee_too_large, Borrowing, BorrowingDetails, BorrowingDetailsRow,
            BorrowingFilter, CreateBorrowing, ReturnOutcome,
        },
        payment::{fine_amount, rental_fee, PaymentType},
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.borrow_date, b.expected_return_date, b.actual_return_date,
           bk.id AS book_id, bk.title AS book_title, bk.author AS book_author,
           bk.cover AS book_cover, bk.inventory AS book_inventory,
           bk.daily_fee AS book_daily_fee,
           u.id AS user_id, u.email AS user_email,
           u.first_name AS user_first_name, u.last_name AS user_last_name
    FROM borrowings b
    JOIN books bk ON b.book_id = bk.id
    JOIN users u ON b.user_id = u.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingsRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Borrowing>;
    async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails>;
    async fn list(&self, filter: BorrowingFilter) -> AppResult<Vec<BorrowingDetails>>;
    /// Take one copy of the book and record the borrowing with its rental
    /// payment, all or nothing. Fails with `BookNotAvailable` when the
    /// inventory is exhausted.
    async fn create(&self, user_id: i32, borrowing: &CreateBorrowing) -> AppResult<Borrowing>;
    /// Stamp the return date and put the copy back, unless already returned.
    /// Late returns record a fine computed with `fine_multiplier`.
    async fn mark_returned(
        &self,
        id: i32,
        actual_return_date: NaiveDate,
        fine_multiplier: u32,
    ) -> AppResult<ReturnOutcome>;
}

#[derive(Clone)]
pub struct PgBorrowingsRepository {
    pool: Pool<Postgres>,
}

impl PgBorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert_payment(
        tx: &mut Transaction<'_, Postgres>,
        borrowing_id: i32,
        payment_type: PaymentType,
        amount: Decimal,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (status, type, borrowing_id, money_to_pay)
            VALUES ('Pending', $1, $2, $3)
            "#,
        )
        .bind(payment_type)
        .bind(borrowing_id)
        .bind(amount)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BorrowingsRepository for PgBorrowingsRepository {
    async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))
    }

    async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails> {
        let row = sqlx::query_as::<_, BorrowingDetailsRow>(&format!("{} WHERE b.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))?;

        Ok(row.into())
    }

    async fn list(&self, filter: BorrowingFilter) -> AppResult<Vec<BorrowingDetails>> {
        let rows = sqlx::query_as::<_, BorrowingDetailsRow>(&format!(
            r#"{}
            WHERE ($1::int IS NULL OR b.user_id = $1)
              AND ($2::bool IS NULL OR (b.actual_return_date IS NULL) = $2)
            ORDER BY b.id
            "#,
            DETAILS_SELECT
        ))
        .bind(filter.user_id)
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BorrowingDetails::from).collect())
    }

    async fn create(&self, user_id: i32, borrowing: &CreateBorrowing) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        // The row lock taken by the UPDATE serializes concurrent borrows of the same book
        let daily_fee: Option<Decimal> = sqlx::query_scalar(
            r#"
            UPDATE books SET inventory = inventory - 1
            WHERE id = $1 AND inventory > 0
            RETURNING daily_fee
            "#,
        )
        .bind(borrowing.book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let daily_fee = match daily_fee {
            Some(fee) => fee,
            None => {
                let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(borrowing.book_id)
                    .fetch_one(&mut *tx)
                    .await?;
                return Err(if exists {
                    AppError::BookNotAvailable(borrowing.book_id)
                } else {
                    AppError::NotFound(format!("Book with id {} not found", borrowing.book_id))
                });
            }
        };

        let created = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (borrow_date, expected_return_date, book_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(borrowing.borrow_date)
        .bind(borrowing.expected_return_date)
        .bind(borrowing.book_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        // Dropping the transaction gives the copy back
        let amount = rental_fee(daily_fee, created.borrow_date, created.expected_return_date)
            .ok_or_else(|| AppError::InvalidFields(rental_fee_too_large()))?;
        Self::insert_payment(&mut tx, created.id, PaymentType::Payment, amount).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn mark_returned(
        &self,
        id: i32,
        actual_return_date: NaiveDate,
        fine_multiplier: u32,
    ) -> AppResult<ReturnOutcome> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))?;

        if !current.is_active() {
            tx.rollback().await?;
            return Ok(ReturnOutcome {
                borrowing: current,
                newly_returned: false,
            });
        }

        let returned = sqlx::query_as::<_, Borrowing>(
            "UPDATE borrowings SET actual_return_date = $1 WHERE id = $2 RETURNING *",
        )
        .bind(actual_return_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let daily_fee: Decimal = sqlx::query_scalar(
            "UPDATE books SET inventory = inventory + 1 WHERE id = $1 RETURNING daily_fee",
        )
        .bind(returned.book_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(fine) = fine_amount(
            daily_fee,
            returned.expected_return_date,
            actual_return_date,
            fine_multiplier,
        ) {
            Self::insert_payment(&mut tx, returned.id, PaymentType::Fine, fine).await?;
        }

        tx.commit().await?;

        Ok(ReturnOutcome {
            borrowing: returned,
            newly_returned: true,
        })
    }
}
