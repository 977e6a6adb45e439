//! API handlers for the lending REST endpoints

pub mod books;
pub mod borrowings;
pub mod health;
pub mod openapi;
pub mod payments;
pub mod users;


use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    models::user::{authorize, Capability, UserClaims},
    AppState,
};

/// The caller of a request: anonymous, or identified by a valid bearer token.
///
/// A missing credential yields an anonymous caller; a malformed or invalid
/// one rejects the request.
pub struct Caller(pub Option<UserClaims>);

impl Caller {
    /// Check the capability an operation needs
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        authorize(self.0.as_ref(), capability)
    }

    /// Check a capability that needs an identified caller and return its claims
    pub fn authenticated(&self, capability: Capability) -> AppResult<&UserClaims> {
        self.require(capability)?;
        self.0
            .as_ref()
            .ok_or_else(|| AppError::Authentication("Authentication credentials were not provided".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.config.auth;

        let Some(value) = parts.headers.get(auth.header_name.as_str()) else {
            return Ok(Caller(None));
        };

        let header = value
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token.trim(), &auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(Caller(Some(claims)))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        // Borrowings
        .route(
            "/borrowings",
            get(borrowings::list_borrowings).post(borrowings::create_borrowing),
        )
        .route(
            "/borrowings/:id",
            get(borrowings::get_borrowing).patch(borrowings::return_borrowing),
        )
        .route("/borrowings/:id/return", put(borrowings::return_borrowing))
        // Payments
        .route("/payments", get(payments::list_payments))
        .route("/payments/:id", get(payments::get_payment))
        .route("/payments/:id/paid", post(payments::mark_paid))
        // Users
        .route("/users/me", get(users::get_me).patch(users::update_me))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
