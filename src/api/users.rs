//! Own-profile endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::{Capability, UpdateProfile, User},
    AppState,
};

use super::Caller;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(State(state): State<AppState>, caller: Caller) -> AppResult<Json<User>> {
    let claims = caller.authenticated(Capability::Account)?;

    let user = state.services.users.get_profile(claims).await?;
    Ok(Json(user))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    caller: Caller,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    let claims = caller.authenticated(Capability::Account)?;

    let user = state.services.users.update_profile(claims, profile).await?;
    Ok(Json(user))
}
