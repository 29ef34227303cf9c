use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Belgrade;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};

use super::{calendar::FixedClock, retry::RetryPolicy, ExpiryJob, ExpirySettings};
use crate::server::mail::fake::RecordingMailer;


pub const FOUNDER: &str = "owner@gard018.com";

/// 00:30 on 2025-01-10 in Belgrade.
pub fn run_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 9, 23, 30, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

pub fn warning_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
}

/// Settings with no waiting between attempts or batches.
pub fn settings() -> ExpirySettings {
    ExpirySettings {
        timezone: Belgrade,
        warning_days: 3,
        founder_email: FOUNDER.to_string(),
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        },
        batch_pause: Duration::ZERO,
    }
}

pub fn job(db: &DatabaseConnection, mailer: &RecordingMailer) -> ExpiryJob {
    ExpiryJob::new(
        db.clone(),
        Arc::new(mailer.clone()),
        Arc::new(FixedClock(run_instant())),
        settings(),
    )
}
