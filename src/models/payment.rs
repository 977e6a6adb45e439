//! Payment and fine records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Paid" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

text_enum_sqlx!(PaymentStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentType {
    /// Regular rental fee
    Payment,
    /// Late return penalty
    Fine,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Payment => "Payment",
            PaymentType::Fine => "Fine",
        }
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Payment" => Ok(PaymentType::Payment),
            "Fine" => Ok(PaymentType::Fine),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

text_enum_sqlx!(PaymentType);

/// Payment record linked to a borrowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: i32,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub payment_type: PaymentType,
    pub borrowing_id: i32,
    /// Checkout session of the external payment provider
    pub session_url: Option<String>,
    pub session_id: Option<String>,
    #[schema(value_type = String, example = "4.50")]
    pub money_to_pay: Decimal,
}

/// Largest amount the `money_to_pay` NUMERIC(14, 2) column holds
pub fn max_payment() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Rental fee charged when a book is borrowed: one day minimum.
/// `None` when the amount cannot be recorded as a payment.
pub fn rental_fee(
    daily_fee: Decimal,
    borrow_date: NaiveDate,
    expected_return_date: NaiveDate,
) -> Option<Decimal> {
    let days = (expected_return_date - borrow_date).num_days().max(1);
    daily_fee
        .checked_mul(Decimal::from(days))
        .map(|fee| fee.round_dp(2))
        .filter(|fee| *fee <= max_payment())
}

/// Fine for a late return, `None` when returned on time. Capped at
/// [`max_payment`] so recording it never fails.
pub fn fine_amount(
    daily_fee: Decimal,
    expected_return_date: NaiveDate,
    actual_return_date: NaiveDate,
    multiplier: u32,
) -> Option<Decimal> {
    let overdue = (actual_return_date - expected_return_date).num_days();
    if overdue <= 0 {
        return None;
    }
    let fine = daily_fee
        .checked_mul(Decimal::from(overdue))
        .and_then(|fine| fine.checked_mul(Decimal::from(multiplier)))
        .map(|fine| fine.round_dp(2))
        .unwrap_or_else(max_payment);
    Some(fine.min(max_payment()))
}
