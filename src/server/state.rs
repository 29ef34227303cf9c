//! Application state shared across all request handlers.
//!
//! `AppState` is built once at startup and cloned into every handler through Axum's
//! state extraction. Every field is cheap to clone: the database connection is a
//! pool and the rest are reference-counted.

use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use url::Url;

use crate::server::{
    mail::Mailer,
    middleware::rate_limit::RateLimiter,
    service::expiry::{calendar::Clock, ExpiryJob},
};

#[derive(Clone)]
pub struct AppState {
    /// Connection pool for the SQLite database.
    pub db: DatabaseConnection,

    /// Outgoing transactional email.
    pub mailer: Arc<dyn Mailer>,

    /// Membership expiry job, shared with the scheduler so runs never overlap.
    pub expiry_job: ExpiryJob,

    /// Per-client request budgets for the public endpoints.
    pub rate_limiter: RateLimiter,

    pub clock: Arc<dyn Clock>,

    /// Bearer secret expected on the cron endpoint.
    pub cron_secret: Arc<str>,

    /// Public base URL of the portal, used in emailed links.
    pub app_url: Url,

    /// Timezone in which membership dates are interpreted.
    pub club_timezone: Tz,

    /// Lowercased email of the admin that cannot be removed.
    pub primary_admin_email: Option<Arc<str>>,
}

impl AppState {
    pub fn primary_admin_email(&self) -> Option<&str> {
        self.primary_admin_email.as_deref()
    }
}
