//! Borrowing endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::{Borrowing, BorrowingDetails, BorrowingQuery, CreateBorrowing, ReturnBorrowing},
        user::Capability,
    },
    AppState,
};

use super::Caller;

/// List borrowings visible to the caller
///
/// Staff see every borrowing and may narrow to one user with `user_id`;
/// other users always get their own, whatever `user_id` says.
#[utoipa::path(
    get,
    path = "/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(BorrowingQuery),
    responses(
        (status = 200, description = "Borrowings", body = Vec<BorrowingDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrowings(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<BorrowingQuery>,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    let claims = caller.authenticated(Capability::Borrow)?;

    let borrowings = state.services.borrowings.list(claims, &query).await?;
    Ok(Json(borrowings))
}

/// Get a borrowing with its book and borrower
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing details", body = BorrowingDetails),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_borrowing(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingDetails>> {
    let claims = caller.authenticated(Capability::Borrow)?;

    let borrowing = state.services.borrowings.get(claims, id).await?;
    Ok(Json(borrowing))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowing,
    responses(
        (status = 201, description = "Borrowing created", body = Borrowing),
        (status = 400, description = "Invalid dates or book not available", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_borrowing(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateBorrowing>,
) -> AppResult<(StatusCode, Json<Borrowing>)> {
    let claims = caller.authenticated(Capability::Borrow)?;

    let created = state.services.borrowings.create(claims, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Return a borrowed book
///
/// Returning an already returned borrowing succeeds and changes nothing.
#[utoipa::path(
    put,
    path = "/borrowings/{id}/return",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    request_body = ReturnBorrowing,
    responses(
        (status = 200, description = "Book returned", body = Borrowing),
        (status = 400, description = "Invalid return date", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn return_borrowing(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    body: Result<Json<ReturnBorrowing>, JsonRejection>,
) -> AppResult<Json<Borrowing>> {
    let claims = caller.authenticated(Capability::Borrow)?;

    // A request without a JSON body returns as of today
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => ReturnBorrowing::default(),
        Err(e) => return Err(AppError::BadRequest(e.body_text())),
    };

    let borrowing = state
        .services
        .borrowings
        .return_borrowing(claims, id, request)
        .await?;
    Ok(Json(borrowing))
}
