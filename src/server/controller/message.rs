use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, RateLimitedDto},
        message::{CreateMessageDto, MessageDto, UpdateMessageStatusDto},
    },
    server::{
        error::AppError,
        middleware::{
            auth::{AuthGuard, Permission},
            rate_limit,
        },
        service::message::MessageService,
        state::AppState,
        util::client_ip::ClientIp,
    },
};

/// Tag for grouping contact message endpoints in OpenAPI documentation
pub static MESSAGE_TAG: &str = "message";

/// Submit the contact form.
///
/// # Access Control
/// - Public, limited to 5 requests per client per hour
///
/// # Returns
/// - `201 Created` - Message stored
/// - `400 Bad Request` - Missing name or message, or invalid email
/// - `429 Too Many Requests` - Rate limit exceeded
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = MESSAGE_TAG,
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message stored", body = MessageDto),
        (status = 400, description = "Invalid message", body = ErrorDto),
        (status = 429, description = "Rate limit exceeded", body = RateLimitedDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_message(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateMessageDto>,
) -> Result<impl IntoResponse, AppError> {
    state
        .rate_limiter
        .enforce(rate_limit::CONTACT, &ip, state.clock.now())
        .await?;

    let message = MessageService::new(&state.db).submit(payload).await?;

    Ok((StatusCode::CREATED, Json(message.into_dto())))
}

/// List contact messages, newest first.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = MESSAGE_TAG,
    responses(
        (status = 200, description = "All messages", body = Vec<MessageDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_messages(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let messages = MessageService::new(&state.db).get_all().await?;

    Ok((
        StatusCode::OK,
        Json(messages.into_iter().map(|m| m.into_dto()).collect::<Vec<_>>()),
    ))
}

/// Mark a message read or unread.
///
/// # Access Control
/// - `Admin`
#[utoipa::path(
    patch,
    path = "/api/messages/{id}",
    tag = MESSAGE_TAG,
    params(
        ("id" = i32, Path, description = "Message ID")
    ),
    request_body = UpdateMessageStatusDto,
    responses(
        (status = 200, description = "Message updated", body = MessageDto),
        (status = 400, description = "Unknown status", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Message not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMessageStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let message = MessageService::new(&state.db)
        .set_status(id, &payload.status)
        .await?;

    Ok((StatusCode::OK, Json(message.into_dto())))
}
