use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        member::{CreateMemberDto, MemberDto, UpdateMemberExpiryDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::member::MemberService,
        state::AppState,
    },
};

/// Tag for grouping member endpoints in OpenAPI documentation
pub static MEMBER_TAG: &str = "member";

/// List all members.
///
/// Ordered by expiry date, soonest first.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    get,
    path = "/api/members",
    tag = MEMBER_TAG,
    responses(
        (status = 200, description = "All members", body = Vec<MemberDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_members(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let members = MemberService::new(&state.db, state.club_timezone)
        .get_all()
        .await?;

    Ok((
        StatusCode::OK,
        Json(members.into_iter().map(|m| m.into_dto()).collect::<Vec<_>>()),
    ))
}

/// Add a member.
///
/// The membership runs for one calendar month from the start date.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `201 Created` - The new member
/// - `400 Bad Request` - Missing name or invalid email
#[utoipa::path(
    post,
    path = "/api/members",
    tag = MEMBER_TAG,
    request_body = CreateMemberDto,
    responses(
        (status = 201, description = "Member created", body = MemberDto),
        (status = 400, description = "Invalid member data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_member(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateMemberDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let member = MemberService::new(&state.db, state.club_timezone)
        .create(payload)
        .await?;

    Ok((StatusCode::CREATED, Json(member.into_dto())))
}

/// Change a member's expiry date.
///
/// The status follows the new date: active through the expiry day in the club's
/// timezone, expired afterwards.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - The updated member
/// - `404 Not Found` - No member with that id
#[utoipa::path(
    patch,
    path = "/api/members/{id}",
    tag = MEMBER_TAG,
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    request_body = UpdateMemberExpiryDto,
    responses(
        (status = 200, description = "Member updated", body = MemberDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_member(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMemberExpiryDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let member = MemberService::new(&state.db, state.club_timezone)
        .update_expiry(id, payload.expiry_date, state.clock.now())
        .await?;

    Ok((StatusCode::OK, Json(member.into_dto())))
}

/// Delete a member.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `204 No Content` - Member deleted
/// - `404 Not Found` - No member with that id
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = MEMBER_TAG,
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_member(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    MemberService::new(&state.db, state.club_timezone)
        .delete(id)
        .await?;
    tracing::info!("{} deleted member {}", user.email, id);

    Ok(StatusCode::NO_CONTENT)
}

/// Get the caller's own membership.
///
/// Returns the newest membership registered to the logged-in user's email, or
/// `null` when there is none.
///
/// # Access Control
/// - Logged-in users
#[utoipa::path(
    get,
    path = "/api/members/me",
    tag = MEMBER_TAG,
    responses(
        (status = 200, description = "The caller's membership or null", body = Option<MemberDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_my_membership(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let member = MemberService::new(&state.db, state.club_timezone)
        .find_for_email(&user.email)
        .await?;

    Ok((StatusCode::OK, Json(member.map(|m| m.into_dto()))))
}
