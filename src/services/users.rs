//! Own-profile operations

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{UpdateProfile, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_profile(&self, claims: &UserClaims) -> AppResult<User> {
        self.repository.users.get_by_id(claims.user_id).await
    }

    pub async fn update_profile(&self, claims: &UserClaims, profile: UpdateProfile) -> AppResult<User> {
        profile.validate()?;

        if let Some(ref email) = profile.email {
            if self.repository.users.email_exists(email, Some(claims.user_id)).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        self.repository.users.update_profile(claims.user_id, &profile).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::{
        books::MockBooksRepository, borrowings::MockBorrowingsRepository,
        health::MockHealthRepository, payments::MockPaymentsRepository,
        users::MockUsersRepository,
    };

    fn service(users: MockUsersRepository) -> UsersService {
        UsersService::new(Repository {
            books: Arc::new(MockBooksRepository::new()),
            borrowings: Arc::new(MockBorrowingsRepository::new()),
            health: Arc::new(MockHealthRepository::new()),
            payments: Arc::new(MockPaymentsRepository::new()),
            users: Arc::new(users),
        })
    }

    fn claims() -> UserClaims {
        UserClaims {
            sub: "bob@example.com".into(),
            user_id: 1,
            is_staff: false,
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_taken_email_is_a_conflict() {
        let mut users = MockUsersRepository::new();
        users
            .expect_email_exists()
            .withf(|email, exclude| email.to_string() == "taken@example.com" && *exclude == Some(1))
            .returning(|_, _| Ok(true));
        users.expect_update_profile().never();

        let profile = UpdateProfile {
            email: Some("taken@example.com".into()),
            ..Default::default()
        };
        let result = service(users).update_profile(&claims(), profile).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_lookup() {
        let mut users = MockUsersRepository::new();
        users.expect_email_exists().never();

        let profile = UpdateProfile {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let result = service(users).update_profile(&claims(), profile).await;
        assert!(matches!(result, Err(AppError::InvalidFields(_))));
    }
}
