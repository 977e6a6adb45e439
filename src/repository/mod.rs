//! Repository layer for database operations
//!
//! Each table group sits behind a trait so services can be exercised against
//! mocks; the `Pg*` implementations are the production ones.

pub mod books;
pub mod borrowings;
pub mod health;
pub mod payments;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use books::{BooksRepository, PgBooksRepository};
pub use borrowings::{BorrowingsRepository, PgBorrowingsRepository};
pub use health::{HealthRepository, PgHealthRepository};
pub use payments::{PaymentsRepository, PgPaymentsRepository};
pub use users::{PgUsersRepository, UsersRepository};

/// Main repository struct holding one handle per table group
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BooksRepository>,
    pub borrowings: Arc<dyn BorrowingsRepository>,
    pub health: Arc<dyn HealthRepository>,
    pub payments: Arc<dyn PaymentsRepository>,
    pub users: Arc<dyn UsersRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(PgBooksRepository::new(pool.clone())),
            borrowings: Arc::new(PgBorrowingsRepository::new(pool.clone())),
            health: Arc::new(PgHealthRepository::new(pool.clone())),
            payments: Arc::new(PgPaymentsRepository::new(pool.clone())),
            users: Arc::new(PgUsersRepository::new(pool)),
        }
    }
}
