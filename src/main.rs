mod model;
mod server;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    error::AppError,
    middleware::rate_limit::RateLimiter,
    scheduler::membership_expiry,
    service::expiry::{
        calendar::{Clock, SystemClock},
        ExpiryJob, ExpirySettings,
    },
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db, &config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let mailer = startup::setup_mailer(&config, http_client);

    startup::check_for_admin(&db, &config).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let rate_limiter = RateLimiter::in_memory();
    let expiry_job = ExpiryJob::new(
        db.clone(),
        mailer.clone(),
        clock.clone(),
        ExpirySettings::new(
            config.club_timezone,
            config.expiry_warning_days,
            config.founder_email.clone(),
        ),
    );

    let mut scheduler = membership_expiry::start_scheduler(
        expiry_job.clone(),
        &config.expiry_cron,
        rate_limiter.clone(),
        clock.clone(),
    )
    .await?;

    let state = AppState {
        db,
        mailer,
        expiry_job,
        rate_limiter,
        clock,
        cron_secret: config.cron_secret.as_str().into(),
        app_url: config.app_url.clone(),
        club_timezone: config.club_timezone,
        primary_admin_email: config.primary_admin_email.as_deref().map(Arc::from),
    };

    let app = server::router::router(&config.app_url)?
        .with_state(state)
        .layer(session);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Starting server on {}", config.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown().await?;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
