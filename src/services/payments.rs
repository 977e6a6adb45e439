//! Payment and fine records service

use crate::{
    error::AppResult,
    models::{
        payment::{Payment, PaymentStatus},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
}

impl PaymentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Payments of the caller's borrowings, or all of them for staff
    pub async fn list(&self, claims: &UserClaims) -> AppResult<Vec<Payment>> {
        self.repository.payments.list(claims.owner_scope()).await
    }

    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<Payment> {
        self.repository.payments.get_by_id(id, claims.owner_scope()).await
    }

    /// Record that the provider reported the payment as settled
    pub async fn mark_paid(&self, id: i32) -> AppResult<Payment> {
        let current = self.repository.payments.get_by_id(id, None).await?;
        if current.status == PaymentStatus::Paid {
            return Ok(current);
        }

        let paid = self.repository.payments.mark_paid(id).await?;
        tracing::info!(
            payment_id = id,
            borrowing_id = paid.borrowing_id,
            amount = %paid.money_to_pay,
            "Payment marked as paid"
        );
        Ok(paid)
    }
}
