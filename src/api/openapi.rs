//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrowings, health, payments, users};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Lending API",
        version = "0.1.0",
        description = "Books, borrowings and payments of a lending library"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Borrowings
        borrowings::list_borrowings,
        borrowings::get_borrowing,
        borrowings::create_borrowing,
        borrowings::return_borrowing,
        // Payments
        payments::list_payments,
        payments::get_payment,
        payments::mark_paid,
        // Users
        users::get_me,
        users::update_me,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::CoverType,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::borrowing::Borrowing,
            crate::models::borrowing::BorrowingDetails,
            crate::models::borrowing::CreateBorrowing,
            crate::models::borrowing::ReturnBorrowing,
            crate::models::payment::Payment,
            crate::models::payment::PaymentStatus,
            crate::models::payment::PaymentType,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::UpdateProfile,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "borrowings", description = "Borrowing lifecycle"),
        (name = "payments", description = "Rental payments and fines"),
        (name = "users", description = "Own profile")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
