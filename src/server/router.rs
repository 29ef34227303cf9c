use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use url::Url;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        admin::{self, ADMIN_TAG},
        auth::{self, AUTH_TAG},
        cron::{self, CRON_TAG},
        member::{self, MEMBER_TAG},
        message::{self, MESSAGE_TAG},
        profile::{self, PROFILE_TAG},
    },
    error::AppError,
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "GARD 018 API"),
    modifiers(&CronSecurity),
    tags(
        (name = AUTH_TAG, description = "Accounts, sessions and password resets"),
        (name = MEMBER_TAG, description = "Club memberships"),
        (name = ADMIN_TAG, description = "Admin access management"),
        (name = MESSAGE_TAG, description = "Contact form messages"),
        (name = PROFILE_TAG, description = "The caller's own account"),
        (name = CRON_TAG, description = "Daily membership expiry check")
    )
)]
struct ApiDoc;

struct CronSecurity;

impl Modify for CronSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cron_secret",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// API routes together with their OpenAPI document.
fn api_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Auth
        .routes(routes!(auth::register))
        .routes(routes!(auth::register_with_membership))
        .routes(routes!(auth::login))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_session))
        .routes(routes!(auth::check_admin))
        .routes(routes!(auth::forgot_password))
        .routes(routes!(auth::reset_password))
        // Members
        .routes(routes!(member::get_members, member::create_member))
        .routes(routes!(member::update_member, member::delete_member))
        .routes(routes!(member::get_my_membership))
        // Admins
        .routes(routes!(admin::get_admins, admin::create_admin))
        .routes(routes!(admin::delete_admin))
        // Messages
        .routes(routes!(message::create_message, message::get_messages))
        .routes(routes!(message::update_message))
        // Profile
        .routes(routes!(profile::update_profile, profile::delete_profile))
        // Membership check
        .routes(routes!(cron::check_memberships))
        .routes(routes!(cron::test_cron))
        .routes(routes!(cron::test_email))
}

/// Builds the application router without state or session layer.
///
/// Every response carries the security headers; cross-origin requests are only
/// accepted from `app_url` with credentials.
pub fn router(app_url: &Url) -> Result<Router<AppState>, AppError> {
    let (router, api) = api_router().split_for_parts();

    Ok(router
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", api))
        .layer(cors_layer(app_url)?)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ))
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(app_url: &Url) -> Result<CorsLayer, AppError> {
    let origin = app_url.origin().ascii_serialization();
    let origin = HeaderValue::from_str(&origin)
        .map_err(|e| AppError::InternalError(format!("Invalid APP_URL origin: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
