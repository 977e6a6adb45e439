//! Book (catalog) model and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// Cover type of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CoverType {
    Hard,
    Soft,
}

impl CoverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverType::Hard => "Hard",
            CoverType::Soft => "Soft",
        }
    }
}

impl std::fmt::Display for CoverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CoverType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hard" => Ok(CoverType::Hard),
            "Soft" => Ok(CoverType::Soft),
            _ => Err(format!("Invalid cover type: {}", s)),
        }
    }
}

// Stored as VARCHAR, not a Postgres enum
text_enum_sqlx!(CoverType);

/// Book as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub cover: Option<CoverType>,
    /// Copies currently available to lend
    pub inventory: i32,
    #[schema(value_type = String, example = "0.50")]
    pub daily_fee: Decimal,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,
    pub cover: Option<CoverType>,
    #[validate(range(min = 0, message = "Inventory must not be negative"))]
    pub inventory: i32,
    #[schema(value_type = String, example = "0.50")]
    pub daily_fee: Decimal,
}

/// Partial book update (PATCH); absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: Option<String>,
    pub cover: Option<CoverType>,
    #[validate(range(min = 0, message = "Inventory must not be negative"))]
    pub inventory: Option<i32>,
    #[schema(value_type = Option<String>, example = "0.50")]
    pub daily_fee: Option<Decimal>,
}

/// Largest value a NUMERIC(8, 2) column holds
const MAX_DAILY_FEE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

fn check_daily_fee(fee: &Decimal) -> Result<(), ValidationError> {
    let mut error = if fee.is_sign_negative() && !fee.is_zero() {
        ValidationError::new("range")
    } else if fee.normalize().scale() > 2 {
        ValidationError::new("scale")
    } else if *fee > MAX_DAILY_FEE {
        ValidationError::new("range")
    } else {
        return Ok(());
    };
    error.message = Some("Daily fee must be between 0 and 999999.99 with at most 2 decimals".into());
    Err(error)
}

impl CreateBook {
    /// Derived field checks plus the daily fee bounds
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Err(e) = check_daily_fee(&self.daily_fee) {
            errors.add("daily_fee", e);
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateBook {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Some(Err(e)) = self.daily_fee.as_ref().map(check_daily_fee) {
            errors.add("daily_fee", e);
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(inventory: i32, daily_fee: Decimal) -> CreateBook {
        CreateBook {
            title: "Test Book".into(),
            author: "Test Author".into(),
            cover: None,
            inventory,
            daily_fee,
        }
    }

    #[test]
    fn test_valid_book_passes() {
        assert!(new_book(12, Decimal::new(2323, 2)).check().is_ok());
    }

    #[test]
    fn test_negative_inventory_is_reported_per_field() {
        let errors = new_book(-1, Decimal::new(2323, 2)).check().unwrap_err();
        assert!(errors.field_errors().contains_key("inventory"));
        assert!(!errors.field_errors().contains_key("daily_fee"));
    }

    #[test]
    fn test_daily_fee_bounds() {
        assert!(new_book(1, Decimal::new(-1, 2)).check().is_err());
        assert!(new_book(1, Decimal::new(1234, 3)).check().is_err());
        // 1.500 normalizes to 1.5
        assert!(new_book(1, Decimal::new(1500, 3)).check().is_ok());
        assert!(new_book(1, Decimal::new(100_000_000, 2)).check().is_err());
        assert!(new_book(1, Decimal::ZERO).check().is_ok());
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateBook::default().check().is_ok());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let update = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.check().unwrap_err().field_errors().contains_key("title"));
    }

    #[test]
    fn test_cover_type_parses_exact_names() {
        assert_eq!("Hard".parse::<CoverType>(), Ok(CoverType::Hard));
        assert_eq!("Soft".parse::<CoverType>(), Ok(CoverType::Soft));
        assert!("hard".parse::<CoverType>().is_err());
    }
}
