//! Payment endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{payment::Payment, user::Capability},
    AppState,
};

use super::Caller;

/// List payments of the caller's borrowings (all payments for staff)
#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payments", body = Vec<Payment>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<Vec<Payment>>> {
    let claims = caller.authenticated(Capability::Borrow)?;

    let payments = state.services.payments.list(claims).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn get_payment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<Payment>> {
    let claims = caller.authenticated(Capability::Borrow)?;

    let payment = state.services.payments.get(claims, id).await?;
    Ok(Json(payment))
}

/// Mark a payment as paid
#[utoipa::path(
    post,
    path = "/payments/{id}/paid",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment settled", body = Payment),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn mark_paid(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<Payment>> {
    caller.require(Capability::ManagePayments)?;

    let payment = state.services.payments.mark_paid(id).await?;
    Ok(Json(payment))
}
