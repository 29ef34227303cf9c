use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user id stored in the session; the caller is not logged in.
    #[error("No user in session")]
    UserNotInSession,

    /// The session references a user that no longer exists.
    #[error("User {0} from session not found in database")]
    UserNotInDatabase(i32),

    /// Unknown email or wrong password on login.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Cron request without a matching `Authorization: Bearer` secret.
    #[error("Missing or invalid cron secret")]
    InvalidCronSecret,

    /// User is authenticated but lacks the required permission.
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// Password reset token is unknown, used or expired.
    #[error("Invalid or expired password reset token")]
    InvalidResetToken,
}

/// Converts authentication errors into HTTP responses.
///
/// Details are logged at debug level, clients get short generic messages:
/// - `UserNotInSession` / `UserNotInDatabase` → 401 "Not authenticated"
/// - `InvalidCredentials` → 401 "Invalid email or password"
/// - `InvalidCronSecret` → 401 "Unauthorized"
/// - `AccessDenied` → 403 "Access denied"
/// - `InvalidResetToken` → 400 "Invalid or expired reset link"
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "Not authenticated")
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
            Self::InvalidCronSecret => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Access denied"),
            Self::InvalidResetToken => (StatusCode::BAD_REQUEST, "Invalid or expired reset link"),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
