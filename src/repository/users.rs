//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{UpdateProfile, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<User>;
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn update_profile(&self, id: i32, profile: &UpdateProfile) -> AppResult<User>;
}

#[derive(Clone)]
pub struct PgUsersRepository {
    pool: Pool<Postgres>,
}

impl PgUsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, is_staff FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1) AND ($2::int IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_profile(&self, id: i32, profile: &UpdateProfile) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name)
            WHERE id = $1
            RETURNING id, email, first_name, last_name, is_staff
            "#,
        )
        .bind(id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race with another account taking the same email
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Email already in use".to_string())
            }
            e => AppError::Database(e),
        })?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }
}
