use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        admin::{AdminDto, CreateAdminDto},
        api::ErrorDto,
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::admin::AdminService,
        state::AppState,
    },
};

/// Tag for grouping admin management endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

/// List admins.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    get,
    path = "/api/admins",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "All admins", body = Vec<AdminDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_admins(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let admins = AdminService::new(&state.db, state.primary_admin_email())
        .get_all()
        .await?;

    Ok((
        StatusCode::OK,
        Json(admins.into_iter().map(|a| a.into_dto()).collect::<Vec<_>>()),
    ))
}

/// Grant admin access.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `201 Created` - The new admin, granted by the caller
/// - `409 Conflict` - Email is already an admin
#[utoipa::path(
    post,
    path = "/api/admins",
    tag = ADMIN_TAG,
    request_body = CreateAdminDto,
    responses(
        (status = 201, description = "Admin added", body = AdminDto),
        (status = 400, description = "Invalid email", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 409, description = "Already an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_admin(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateAdminDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let admin = AdminService::new(&state.db, state.primary_admin_email())
        .grant(&payload.email, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(admin.into_dto())))
}

/// Revoke admin access.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `204 No Content` - Access revoked
/// - `400 Bad Request` - Caller tried to remove themselves
/// - `403 Forbidden` - The primary admin cannot be removed
/// - `404 Not Found` - Email is not an admin
#[utoipa::path(
    delete,
    path = "/api/admins/{email}",
    tag = ADMIN_TAG,
    params(
        ("email" = String, Path, description = "Admin email address")
    ),
    responses(
        (status = 204, description = "Admin removed"),
        (status = 400, description = "Cannot remove yourself", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin, or target is the primary admin", body = ErrorDto),
        (status = 404, description = "Admin not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    session: Session,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, state.primary_admin_email())
        .revoke(&email, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
