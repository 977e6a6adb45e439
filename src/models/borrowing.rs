//! Borrowing model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{ValidationError, ValidationErrors};

use super::book::{Book, CoverType};
use super::user::{UserClaims, UserShort};

/// Borrowing row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i32,
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    /// Unset while the book is still out
    pub actual_return_date: Option<NaiveDate>,
    pub book_id: i32,
    pub user_id: i32,
}

impl Borrowing {
    pub fn is_active(&self) -> bool {
        self.actual_return_date.is_none()
    }
}

/// Borrowing with its book and borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BorrowingDetails {
    pub id: i32,
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub book: Book,
    pub user: UserShort,
}

/// Internal row structure for the borrowings/books/users join
#[derive(Debug, Clone, FromRow)]
pub struct BorrowingDetailsRow {
    id: i32,
    borrow_date: NaiveDate,
    expected_return_date: NaiveDate,
    actual_return_date: Option<NaiveDate>,
    book_id: i32,
    book_title: String,
    book_author: String,
    book_cover: Option<CoverType>,
    book_inventory: i32,
    book_daily_fee: rust_decimal::Decimal,
    user_id: i32,
    user_email: String,
    user_first_name: String,
    user_last_name: String,
}

impl From<BorrowingDetailsRow> for BorrowingDetails {
    fn from(row: BorrowingDetailsRow) -> Self {
        BorrowingDetails {
            id: row.id,
            borrow_date: row.borrow_date,
            expected_return_date: row.expected_return_date,
            actual_return_date: row.actual_return_date,
            book: Book {
                id: row.book_id,
                title: row.book_title,
                author: row.book_author,
                cover: row.book_cover,
                inventory: row.book_inventory,
                daily_fee: row.book_daily_fee,
            },
            user: UserShort {
                id: row.user_id,
                email: row.user_email,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
            },
        }
    }
}

/// Create borrowing request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBorrowing {
    /// Book ID
    #[serde(alias = "book")]
    pub book_id: i32,
    pub borrow_date: NaiveDate,
    pub expected_return_date: NaiveDate,
}

impl CreateBorrowing {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.expected_return_date < self.borrow_date {
            errors.add(
                "expected_return_date",
                date_error("Expected return date cannot be before the borrow date"),
            );
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Return request; the date defaults to today
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReturnBorrowing {
    pub actual_return_date: Option<NaiveDate>,
}

/// Check a return date against the borrowing it closes
pub fn check_return_date(borrowing: &Borrowing, date: NaiveDate) -> Result<(), ValidationErrors> {
    if date < borrowing.borrow_date {
        let mut errors = ValidationErrors::new();
        errors.add(
            "actual_return_date",
            date_error("Return date cannot be before the borrow date"),
        );
        return Err(errors);
    }
    Ok(())
}

/// Field error for a borrowing whose rental fee is too large to record
pub fn rental_fee_too_large() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let mut error = ValidationError::new("range");
    error.message = Some("Rental fee for this period is too large".into());
    errors.add("expected_return_date", error);
    errors
}

fn date_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("date_order");
    error.message = Some(message.into());
    error
}

/// Result of a return attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnOutcome {
    pub borrowing: Borrowing,
    /// False when the borrowing had already been returned
    pub newly_returned: bool,
}

/// Borrowing list query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BorrowingQuery {
    /// Restrict to one user's borrowings (staff only)
    pub user_id: Option<i32>,
    /// `true` for books still out, `false` for returned ones
    pub is_active: Option<bool>,
}

/// Effective filter handed to the repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorrowingFilter {
    pub user_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl BorrowingFilter {
    /// Non-staff callers are pinned to their own rows whatever `user_id` says
    pub fn for_caller(claims: &UserClaims, query: &BorrowingQuery) -> Self {
        Self {
            user_id: claims.owner_scope().or(query.user_id),
            is_active: query.is_active,
        }
    }
}
