//! Initialization of the database, sessions, HTTP client and mailer.

use std::{sync::Arc, time::Duration};
use time::Duration as SessionDuration;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::Config,
    error::AppError,
    mail::{resend::ResendMailer, Mailer},
    service::admin::AdminService,
};

/// Connects to the SQLite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect or to migrate
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// Sessions expire after 7 days of inactivity. The cookie is HttpOnly and
/// SameSite=Lax, and Secure unless disabled for local development.
pub async fn connect_to_session(
    db: &sea_orm::DatabaseConnection,
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let store = SqliteStore::new(db.get_sqlite_connection_pool().clone());
    store
        .migrate()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to migrate session store: {}", e)))?;

    Ok(SessionManagerLayer::new(store)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.session_secure)
        .with_expiry(Expiry::OnInactivity(SessionDuration::days(7))))
}

/// HTTP client for outgoing API calls.
///
/// Redirects are disabled and requests time out after 30 seconds.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .build()?)
}

pub fn setup_mailer(config: &Config, http_client: reqwest::Client) -> Arc<dyn Mailer> {
    Arc::new(ResendMailer::new(
        http_client,
        config.resend_api_url.clone(),
        config.resend_api_key.clone(),
        config.mail_from.clone(),
        config.mail_reply_to.clone(),
    ))
}

/// Seeds the primary admin when no admin exists yet.
pub async fn check_for_admin(
    db: &sea_orm::DatabaseConnection,
    config: &Config,
) -> Result<(), AppError> {
    let service = AdminService::new(db, config.primary_admin_email.as_deref());

    if !service.ensure_primary_admin().await? && service.get_all().await?.is_empty() {
        tracing::warn!("No admins configured; set PRIMARY_ADMIN_EMAIL to seed one");
    }

    Ok(())
}
