use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Belgrade;
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use test_utils::{builder::TestBuilder, factory};
use tower::ServiceExt;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;
use url::Url;

use crate::server::{
    mail::fake::RecordingMailer,
    middleware::rate_limit::RateLimiter,
    router::router,
    service::expiry::{
        calendar::{Clock, FixedClock},
        retry::RetryPolicy,
        ExpiryJob, ExpirySettings,
    },
    state::AppState,
};

mod admin;
mod profile;

pub const APP_URL: &str = "https://gard018.com";
pub const CRON_SECRET: &str = "s3cret";
pub const FOUNDER: &str = "owner@gard018.com";
pub const PASSWORD: &str = "correct-horse-42";

/// 00:30 on 2025-01-10 in Belgrade.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 9, 23, 30, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

/// Full application router over an in-memory database and a recording mailer.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub mailer: RecordingMailer,
    pub expiry_job: ExpiryJob,
}

impl TestApp {
    pub async fn new() -> Self {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();

        let store = SqliteStore::new(db.get_sqlite_connection_pool().clone());
        store.migrate().await.unwrap();

        let mailer = RecordingMailer::new();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
        let expiry_job = ExpiryJob::new(
            db.clone(),
            Arc::new(mailer.clone()),
            clock.clone(),
            ExpirySettings {
                timezone: Belgrade,
                warning_days: 3,
                founder_email: FOUNDER.to_string(),
                retry: RetryPolicy {
                    max_attempts: 3,
                    base_delay: Duration::ZERO,
                },
                batch_pause: Duration::ZERO,
            },
        );

        let state = AppState {
            db: db.clone(),
            mailer: Arc::new(mailer.clone()),
            expiry_job: expiry_job.clone(),
            rate_limiter: RateLimiter::in_memory(),
            clock,
            cron_secret: CRON_SECRET.into(),
            app_url: Url::parse(APP_URL).unwrap(),
            club_timezone: Belgrade,
            primary_admin_email: Some(FOUNDER.into()),
        };

        let router = router(&state.app_url)
            .unwrap()
            .with_state(state)
            .layer(SessionManagerLayer::new(store).with_secure(false));

        Self {
            router,
            db,
            mailer,
            expiry_job,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Registers an account and returns its session cookie.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": PASSWORD,
                    "firstName": "Marko",
                    "lastName": "Jovanović",
                }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        session_cookie(&response)
    }

    /// Registers an account, grants it admin access and returns its session cookie.
    pub async fn register_admin(&self, email: &str) -> String {
        let cookie = self.register(email).await;
        factory::create_admin(&self.db, email).await.unwrap();
        cookie
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `name=value` part of the session cookie set by the response.
pub fn session_cookie(response: &Response<Body>) -> String {
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
