//! Borrowing lifecycle service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::{
            check_return_date, Borrowing, BorrowingDetails, BorrowingFilter, BorrowingQuery,
            CreateBorrowing, ReturnBorrowing,
        },
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowingsService {
    repository: Repository,
    fine_multiplier: u32,
}

impl BorrowingsService {
    pub fn new(repository: Repository, fine_multiplier: u32) -> Self {
        Self {
            repository,
            fine_multiplier,
        }
    }

    /// Borrowings visible to the caller, filtered by the query
    pub async fn list(&self, claims: &UserClaims, query: &BorrowingQuery) -> AppResult<Vec<BorrowingDetails>> {
        let filter = BorrowingFilter::for_caller(claims, query);
        self.repository.borrowings.list(filter).await
    }

    /// A borrowing the caller is allowed to see; others report not found
    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<BorrowingDetails> {
        let details = self.repository.borrowings.get_details(id).await?;
        ensure_visible(claims, id, details.user.id)?;
        Ok(details)
    }

    /// Borrow a book for the caller
    pub async fn create(&self, claims: &UserClaims, borrowing: CreateBorrowing) -> AppResult<Borrowing> {
        borrowing.check()?;

        match self.repository.borrowings.create(claims.user_id, &borrowing).await {
            Ok(created) => {
                tracing::info!(
                    borrowing_id = created.id,
                    book_id = created.book_id,
                    user_id = created.user_id,
                    "Book borrowed"
                );
                Ok(created)
            }
            Err(e @ AppError::BookNotAvailable(_)) => {
                tracing::warn!(book_id = borrowing.book_id, user_id = claims.user_id, "Borrow refused: no copies left");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Return a borrowing. Returning it again succeeds without touching the
    /// stored record or the book inventory.
    pub async fn return_borrowing(
        &self,
        claims: &UserClaims,
        id: i32,
        request: ReturnBorrowing,
    ) -> AppResult<Borrowing> {
        let current = self.repository.borrowings.get_by_id(id).await?;
        ensure_visible(claims, id, current.user_id)?;

        if !current.is_active() {
            tracing::debug!(borrowing_id = id, "Borrowing already returned");
            return Ok(current);
        }

        let date = request
            .actual_return_date
            .unwrap_or_else(|| Utc::now().date_naive());
        check_return_date(&current, date)?;

        let outcome = self
            .repository
            .borrowings
            .mark_returned(id, date, self.fine_multiplier)
            .await?;

        if outcome.newly_returned {
            tracing::info!(
                borrowing_id = id,
                book_id = outcome.borrowing.book_id,
                late = date > outcome.borrowing.expected_return_date,
                "Book returned"
            );
        }
        Ok(outcome.borrowing)
    }
}

fn ensure_visible(claims: &UserClaims, id: i32, owner_id: i32) -> AppResult<()> {
    match claims.owner_scope() {
        Some(user_id) if user_id != owner_id => {
            Err(AppError::NotFound(format!("Borrowing with id {} not found", id)))
        }
        _ => Ok(()),
    }
}
