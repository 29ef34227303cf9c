use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, SuccessDto},
        expiry::{ExpiryFailureDto, ExpiryReportDto, ManualTriggerDto, TestEmailDto},
    },
    server::{
        error::AppError,
        mail::view::{format_date_sr, EmailView, ExpiryWarningEmail, CLUB},
        middleware::{
            auth::{AuthGuard, Permission},
            cron::verify_cron_secret,
        },
        service::expiry::calendar::ExpiryCalendar,
        state::AppState,
        util::validate::normalize_email,
    },
};

/// Tag for grouping membership job endpoints in OpenAPI documentation
pub static CRON_TAG: &str = "cron";

/// Turns a failed run into a response.
///
/// A concurrent run keeps its 409; anything else becomes a 500 carrying the cause.
fn run_failure(err: AppError) -> Response {
    if let AppError::Conflict(_) = err {
        return err.into_response();
    }

    tracing::error!("Membership check failed: {}", err);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ExpiryFailureDto {
            success: false,
            error: "Membership check failed".to_string(),
            details: err.to_string(),
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}

/// Run the daily membership check.
///
/// Sends warning emails to members whose membership expires in a few days and
/// expiry emails, plus a notice to the founder, to members expiring today. Expired
/// members are marked as such.
///
/// # Access Control
/// - `Authorization: Bearer <CRON_SECRET>`
///
/// # Returns
/// - `200 OK` - Run report, per-member failures listed under `failed`
/// - `401 Unauthorized` - Missing or wrong secret; nothing is touched
/// - `409 Conflict` - A run is already in progress
/// - `500 Internal Server Error` - Members could not be loaded
#[utoipa::path(
    get,
    path = "/api/cron/check-memberships",
    tag = CRON_TAG,
    security(("cron_secret" = [])),
    responses(
        (status = 200, description = "Membership check completed", body = ExpiryReportDto),
        (status = 401, description = "Missing or invalid cron secret", body = ErrorDto),
        (status = 409, description = "Membership check already running", body = ErrorDto),
        (status = 500, description = "Membership check failed", body = ExpiryFailureDto)
    ),
)]
pub async fn check_memberships(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(err) = verify_cron_secret(&headers, &state.cron_secret) {
        return err.into_response();
    }

    tracing::info!("Membership check triggered by cron");

    match state.expiry_job.run().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => run_failure(err),
    }
}

/// Run the membership check manually.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Report wrapped with the trigger time
/// - `401 Unauthorized` / `403 Forbidden` - Not an admin
/// - `409 Conflict` - A run is already in progress
/// - `500 Internal Server Error` - Members could not be loaded
#[utoipa::path(
    get,
    path = "/api/test-cron",
    tag = CRON_TAG,
    responses(
        (status = 200, description = "Membership check completed", body = ManualTriggerDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 409, description = "Membership check already running", body = ErrorDto),
        (status = 500, description = "Membership check failed", body = ExpiryFailureDto)
    ),
)]
pub async fn test_cron(State(state): State<AppState>, session: Session) -> Response {
    let user = match AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await
    {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    tracing::info!("Membership check triggered manually by {}", user.email);
    let timestamp = Utc::now();

    match state.expiry_job.run().await {
        Ok(result) => (
            StatusCode::OK,
            Json(ManualTriggerDto {
                test_triggered: true,
                timestamp,
                result,
            }),
        )
            .into_response(),
        Err(err) => run_failure(err),
    }
}

/// Send a sample warning email.
///
/// Renders the expiry warning for the calling admin and sends it to the given
/// address to verify the email provider configuration.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Provider accepted the email
/// - `400 Bad Request` - Invalid email address
/// - `500 Internal Server Error` - Provider rejected the email
#[utoipa::path(
    post,
    path = "/api/test-email",
    tag = CRON_TAG,
    request_body = TestEmailDto,
    responses(
        (status = 200, description = "Test email sent", body = SuccessDto),
        (status = 400, description = "Invalid email address", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Email could not be sent", body = ErrorDto)
    ),
)]
pub async fn test_email(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TestEmailDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;
    let to = normalize_email(&payload.email)?;

    let settings = state.expiry_job.settings();
    let calendar = ExpiryCalendar::at(state.clock.now(), settings.timezone, settings.warning_days);

    let message = ExpiryWarningEmail {
        club: &CLUB,
        first_name: &user.first_name,
        last_name: &user.last_name,
        expiry_date: format_date_sr(calendar.warning_date),
        days_left: settings.warning_days,
    }
    .to_message(&to)?;

    let receipt = state.mailer.send(message).await?;
    tracing::info!("Test email sent to {} ({:?})", to, receipt.ids);

    Ok((
        StatusCode::OK,
        Json(SuccessDto::new(format!("Test email sent to {}", to))),
    ))
}
