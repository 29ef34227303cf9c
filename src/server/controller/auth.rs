use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, RateLimitedDto, SuccessDto},
        auth::{
            CheckAdminDto, ForgotPasswordDto, LoginDto, MembershipRegistrationDto, RegisterDto,
            RegisterWithMembershipDto, ResetPasswordDto, UserProfileDto,
        },
    },
    server::{
        data::{admin::AdminRepository, user::UserRepository},
        error::AppError,
        middleware::{auth::AuthGuard, rate_limit, session::AuthSession},
        model::user::User,
        service::{auth::AuthService, password_reset::PasswordResetService},
        state::AppState,
        util::client_ip::ClientIp,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Generic answer to a password reset request, whether or not the account exists.
const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that email exists, a reset link has been sent.";

/// Starts a fresh authenticated session for `user`.
async fn log_in(session: &Session, user: &User) -> Result<(), AppError> {
    let auth_session = AuthSession::new(session);
    auth_session.cycle_id().await?;
    auth_session.set_user_id(user.id).await?;
    Ok(())
}

/// Create an account.
///
/// Registers a user and logs them in.
///
/// # Access Control
/// - Public, limited to 3 requests per client per hour
///
/// # Returns
/// - `201 Created` - Profile of the new user
/// - `400 Bad Request` - Invalid email, name or password
/// - `409 Conflict` - Email already registered
/// - `429 Too Many Requests` - Rate limit exceeded
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = UserProfileDto),
        (status = 400, description = "Invalid registration data", body = ErrorDto),
        (status = 409, description = "Email already registered", body = ErrorDto),
        (status = 429, description = "Rate limit exceeded", body = RateLimitedDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    session: Session,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    state
        .rate_limiter
        .enforce(rate_limit::REGISTER, &ip, state.clock.now())
        .await?;

    let user = AuthService::new(&state.db).register(payload).await?;
    log_in(&session, &user).await?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into_profile_dto(false))))
}

/// Create an account with a membership.
///
/// Registers a user together with an active monthly membership starting on the
/// given date, then logs them in.
///
/// # Access Control
/// - Public, shares the registration rate limit
///
/// # Returns
/// - `201 Created` - New profile and membership
/// - `400 Bad Request` - Invalid registration data
/// - `409 Conflict` - Email already registered
/// - `429 Too Many Requests` - Rate limit exceeded
#[utoipa::path(
    post,
    path = "/api/auth/register-with-membership",
    tag = AUTH_TAG,
    request_body = RegisterWithMembershipDto,
    responses(
        (status = 201, description = "Account and membership created", body = MembershipRegistrationDto),
        (status = 400, description = "Invalid registration data", body = ErrorDto),
        (status = 409, description = "Email already registered", body = ErrorDto),
        (status = 429, description = "Rate limit exceeded", body = RateLimitedDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register_with_membership(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    session: Session,
    Json(payload): Json<RegisterWithMembershipDto>,
) -> Result<impl IntoResponse, AppError> {
    state
        .rate_limiter
        .enforce(rate_limit::REGISTER, &ip, state.clock.now())
        .await?;

    let (user, member) = AuthService::new(&state.db)
        .register_with_membership(payload)
        .await?;
    log_in(&session, &user).await?;
    tracing::info!("Registered user {} with member {}", user.id, member.id);

    Ok((
        StatusCode::CREATED,
        Json(MembershipRegistrationDto {
            user: user.into_profile_dto(false),
            member: member.into_dto(),
        }),
    ))
}

/// Log in with email and password.
///
/// # Access Control
/// - Public, limited to 5 requests per client per minute
///
/// # Returns
/// - `200 OK` - Profile of the logged-in user
/// - `401 Unauthorized` - Unknown email or wrong password
/// - `429 Too Many Requests` - Rate limit exceeded
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = UserProfileDto),
        (status = 401, description = "Invalid email or password", body = ErrorDto),
        (status = 429, description = "Rate limit exceeded", body = RateLimitedDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    session: Session,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    state
        .rate_limiter
        .enforce(rate_limit::LOGIN, &ip, state.clock.now())
        .await?;

    let service = AuthService::new(&state.db);
    let user = service.login(&payload.email, &payload.password).await?;
    let is_admin = service.is_admin(&user).await?;
    log_in(&session, &user).await?;

    Ok((StatusCode::OK, Json(user.into_profile_dto(is_admin))))
}

/// Log out.
///
/// Deletes the session.
///
/// # Returns
/// - `200 OK` - Session removed
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = SuccessDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).flush().await?;

    Ok((StatusCode::OK, Json(SuccessDto::new("Logged out"))))
}

/// Get the logged-in user.
///
/// # Access Control
/// - Logged-in users
///
/// # Returns
/// - `200 OK` - Current profile including admin status
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = UserProfileDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_session(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;
    let is_admin = AdminRepository::new(&state.db).is_admin(&user.email).await?;

    Ok((StatusCode::OK, Json(user.into_profile_dto(is_admin))))
}

/// Check whether the caller is an admin.
///
/// Anonymous callers get `false` rather than an error.
#[utoipa::path(
    get,
    path = "/api/auth/check-admin",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Admin status", body = CheckAdminDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn check_admin(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let mut is_admin = false;

    if let Some(user_id) = AuthSession::new(&session).get_user_id().await? {
        if let Some(user) = UserRepository::new(&state.db).find_by_id(user_id).await? {
            is_admin = AdminRepository::new(&state.db).is_admin(&user.email).await?;
        }
    }

    Ok((StatusCode::OK, Json(CheckAdminDto { is_admin })))
}

/// Request a password reset link.
///
/// Always answers with the same message so the endpoint cannot be used to find
/// out which emails have accounts. Delivery failures are logged only.
///
/// # Access Control
/// - Public, limited to 3 requests per client per 15 minutes
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = AUTH_TAG,
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Request accepted", body = SuccessDto),
        (status = 429, description = "Rate limit exceeded", body = RateLimitedDto)
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    let now = state.clock.now();
    state
        .rate_limiter
        .enforce(rate_limit::FORGOT_PASSWORD, &ip, now)
        .await?;

    if let Err(e) = PasswordResetService::new(&state.db, state.mailer.as_ref(), &state.app_url)
        .request(&payload.email, now)
        .await
    {
        tracing::error!("Failed to process password reset request: {}", e);
    }

    Ok((StatusCode::OK, Json(SuccessDto::new(RESET_REQUESTED_MESSAGE))))
}

/// Set a new password with a reset token.
///
/// # Returns
/// - `200 OK` - Password changed
/// - `400 Bad Request` - Token invalid, used or expired, or password too short
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = AUTH_TAG,
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password changed", body = SuccessDto),
        (status = 400, description = "Invalid token or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    PasswordResetService::new(&state.db, state.mailer.as_ref(), &state.app_url)
        .reset(&payload.token, &payload.password, state.clock.now())
        .await?;

    Ok((
        StatusCode::OK,
        Json(SuccessDto::new("Password has been reset")),
    ))
}
