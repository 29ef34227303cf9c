use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, SuccessDto},
        auth::{UpdateProfileDto, UserProfileDto},
    },
    server::{
        data::admin::AdminRepository,
        error::AppError,
        middleware::{auth::AuthGuard, session::AuthSession},
        service::profile::ProfileService,
        state::AppState,
    },
};

/// Tag for grouping profile endpoints in OpenAPI documentation
pub static PROFILE_TAG: &str = "profile";

/// Update the caller's profile.
///
/// Omitted fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/api/profile",
    tag = PROFILE_TAG,
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserProfileDto),
        (status = 400, description = "Invalid profile data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let updated = ProfileService::new(&state.db, state.primary_admin_email())
        .update(&user, payload)
        .await?;
    let is_admin = AdminRepository::new(&state.db)
        .is_admin(&updated.email)
        .await?;

    Ok((StatusCode::OK, Json(updated.into_profile_dto(is_admin))))
}

/// Delete the caller's account.
///
/// Removes the account, every membership registered to its email and any admin
/// access, then ends the session.
///
/// # Returns
/// - `200 OK` - Account deleted
/// - `403 Forbidden` - The primary admin cannot delete their account
#[utoipa::path(
    delete,
    path = "/api/profile",
    tag = PROFILE_TAG,
    responses(
        (status = 200, description = "Account deleted", body = SuccessDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Primary admin cannot be deleted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ProfileService::new(&state.db, state.primary_admin_email())
        .delete(&user)
        .await?;
    AuthSession::new(&session).flush().await?;

    Ok((StatusCode::OK, Json(SuccessDto::new("Account deleted"))))
}
