//! User model, JWT claims and capability checks

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// User as seen by the lending server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

/// Short user representation nested in borrowings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserShort {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Update own profile request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: Option<String>,
}

/// What an operation needs from its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// List and retrieve books
    ReadCatalog,
    /// Create, read and return own borrowings; read own payments
    Borrow,
    /// Read and update own profile
    Account,
    /// Create, update and delete books
    ManageCatalog,
    /// Read every user's borrowings and payments
    ViewAllBorrowings,
    /// Mark payments as paid
    ManagePayments,
}

impl Capability {
    pub fn is_public(self) -> bool {
        matches!(self, Capability::ReadCatalog)
    }

    pub fn requires_staff(self) -> bool {
        matches!(
            self,
            Capability::ManageCatalog | Capability::ViewAllBorrowings | Capability::ManagePayments
        )
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    /// User email
    pub sub: String,
    pub user_id: i32,
    pub is_staff: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims for `user` valid for `expiration_hours` from now
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = chrono::Utc::now();
        let expiration = chrono::Duration::hours(expiration_hours as i64);
        Self {
            sub: user.email.clone(),
            user_id: user.id,
            is_staff: user.is_staff,
            iat: now.timestamp(),
            exp: (now + expiration).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has(&self, capability: Capability) -> bool {
        !capability.requires_staff() || self.is_staff
    }

    /// Owner restriction applied to borrowing and payment queries; `None` for staff
    pub fn owner_scope(&self) -> Option<i32> {
        if self.has(Capability::ViewAllBorrowings) {
            None
        } else {
            Some(self.user_id)
        }
    }
}

/// Check `capability` for a caller that may be anonymous.
///
/// Anonymous callers pass only public capabilities and otherwise get an
/// authentication error; authenticated callers lacking the capability get an
/// authorization error.
pub fn authorize(claims: Option<&UserClaims>, capability: Capability) -> Result<(), AppError> {
    match claims {
        _ if capability.is_public() => Ok(()),
        None => Err(AppError::Authentication(
            "Authentication credentials were not provided".to_string(),
        )),
        Some(claims) if claims.has(capability) => Ok(()),
        Some(_) => Err(AppError::Authorization(
            "You do not have permission to perform this action".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(is_staff: bool) -> UserClaims {
        UserClaims::for_user(
            &User {
                id: 7,
                email: "bob@example.com".into(),
                first_name: "Bob".into(),
                last_name: "Ross".into(),
                is_staff,
            },
            1,
        )
    }

    const ALL: [Capability; 6] = [
        Capability::ReadCatalog,
        Capability::Borrow,
        Capability::Account,
        Capability::ManageCatalog,
        Capability::ViewAllBorrowings,
        Capability::ManagePayments,
    ];

    #[test]
    fn test_anonymous_only_reads_catalog() {
        for capability in ALL {
            let result = authorize(None, capability);
            if capability.is_public() {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(AppError::Authentication(_))), "{:?}", capability);
            }
        }
    }

    #[test]
    fn test_member_is_forbidden_staff_capabilities() {
        let member = claims(false);
        for capability in ALL {
            let result = authorize(Some(&member), capability);
            if capability.requires_staff() {
                assert!(matches!(result, Err(AppError::Authorization(_))), "{:?}", capability);
            } else {
                assert!(result.is_ok());
            }
        }
    }

    #[test]
    fn test_staff_has_every_capability() {
        let staff = claims(true);
        for capability in ALL {
            assert!(authorize(Some(&staff), capability).is_ok());
        }
    }

    #[test]
    fn test_owner_scope() {
        assert_eq!(claims(false).owner_scope(), Some(7));
        assert_eq!(claims(true).owner_scope(), None);
    }

    #[test]
    fn test_token_round_trip() {
        let original = claims(true);
        let token = original.create_token("secret").unwrap();
        assert_eq!(UserClaims::from_token(&token, "secret").unwrap(), original);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }
}
