//! Membership expiry job.
//!
//! One run derives today's date in the club timezone, finds active members whose
//! membership expires today or on the warning date, and emails them. Expiring
//! members also trigger a notice to the founder and are marked expired once the
//! provider confirms their batch.
//!
//! The run is split by concern:
//! - `calendar` - Clock and club-local date arithmetic
//! - `classifier` - Selecting warning and expiry members
//! - `batch` - Packing notifications into provider batches
//! - `dispatcher` - Sequential delivery with pacing
//! - `retry` - Exponential backoff for provider calls

pub mod batch;
pub mod calendar;
pub mod classifier;
pub mod dispatcher;
pub mod retry;

#[cfg(test)]
mod test;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

use crate::{
    model::expiry::{ExpiryReportDto, FailedNotificationDto, NotificationEntryDto},
    server::{
        data::{member::MemberRepository, notification::NotificationRepository},
        error::{mail::MailError, AppError},
        mail::{
            view::{EmailView, ExpiryWarningEmail, FounderExpiryNotice, MembershipExpiredEmail},
            EmailMessage, Mailer, MAX_BATCH_SIZE,
        },
        model::{member::Member, notification::NotificationKind},
    },
};

use self::{
    batch::Notification,
    calendar::{iso_date, Clock, ExpiryCalendar},
    classifier::classify,
    dispatcher::BatchDispatcher,
    retry::RetryPolicy,
};

/// Tunables of the expiry job.
#[derive(Debug, Clone)]
pub struct ExpirySettings {
    pub timezone: Tz,
    /// Days before expiry at which the warning is sent.
    pub warning_days: u32,
    /// Recipient of the notice sent for every expired membership.
    pub founder_email: String,
    pub retry: RetryPolicy,
    /// Pause between consecutive provider batches.
    pub batch_pause: Duration,
}

impl ExpirySettings {
    pub fn new(timezone: Tz, warning_days: u32, founder_email: impl Into<String>) -> Self {
        Self {
            timezone,
            warning_days,
            founder_email: founder_email.into(),
            retry: RetryPolicy::default(),
            batch_pause: Duration::from_secs(1),
        }
    }
}

/// Shared handle to the expiry job.
///
/// The scheduler and the HTTP triggers all run the job through this handle, which
/// allows a single run at a time.
#[derive(Clone)]
pub struct ExpiryJob {
    db: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    settings: Arc<ExpirySettings>,
    running: Arc<Mutex<()>>,
}

impl ExpiryJob {
    pub fn new(
        db: DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        settings: ExpirySettings,
    ) -> Self {
        Self {
            db,
            mailer,
            clock,
            settings: Arc::new(settings),
            running: Arc::new(Mutex::new(())),
        }
    }

    pub fn settings(&self) -> &ExpirySettings {
        &self.settings
    }

    /// Takes the run lock as an in-progress run would.
    #[cfg(test)]
    pub fn hold(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        self.running.try_lock().ok()
    }

    /// Runs the job unless another run is in progress.
    ///
    /// # Returns
    /// - `Ok(ExpiryReportDto)` - The run completed; per-member failures are in the report
    /// - `Err(AppError::Conflict)` - Another run holds the job
    /// - `Err(AppError::DbErr)` - Candidate members could not be loaded
    pub async fn run(&self) -> Result<ExpiryReportDto, AppError> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!("Membership check requested while a run is in progress");
            return Err(AppError::Conflict(
                "Membership check is already running".to_string(),
            ));
        };

        MembershipExpiryService::new(
            &self.db,
            self.mailer.as_ref(),
            self.clock.as_ref(),
            &self.settings,
        )
        .run()
        .await
    }
}

/// Performs one run of the expiry job.
pub struct MembershipExpiryService<'a> {
    db: &'a DatabaseConnection,
    mailer: &'a dyn Mailer,
    clock: &'a dyn Clock,
    settings: &'a ExpirySettings,
}

/// Accumulates the outcome of a run.
#[derive(Default)]
struct RunLog {
    warning_sent: Vec<NotificationEntryDto>,
    expiry_sent: Vec<NotificationEntryDto>,
    skipped: usize,
    failed: Vec<FailedNotificationDto>,
}

impl RunLog {
    fn fail(&mut self, member: &Member, kind: NotificationKind, reason: impl Into<String>) {
        self.failed.push(FailedNotificationDto {
            member_id: member.id,
            name: member.full_name(),
            email: member.email.clone(),
            kind: kind.as_str().to_string(),
            reason: reason.into(),
        });
    }

    fn sent(&mut self, member: &Member, kind: NotificationKind) {
        let entry = NotificationEntryDto {
            member_id: member.id,
            name: member.full_name(),
            email: member.email.clone(),
            expiry_date: iso_date(member.expiry_date),
        };
        match kind {
            NotificationKind::Warning => self.warning_sent.push(entry),
            NotificationKind::Expiry => self.expiry_sent.push(entry),
        }
    }
}

impl<'a> MembershipExpiryService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        mailer: &'a dyn Mailer,
        clock: &'a dyn Clock,
        settings: &'a ExpirySettings,
    ) -> Self {
        Self {
            db,
            mailer,
            clock,
            settings,
        }
    }

    /// Notifies members expiring today or on the warning date.
    ///
    /// Warnings are sent before expiry notices. A member is reported as sent and
    /// recorded in the notification ledger only after the provider confirmed the
    /// batch carrying its messages; expiring members are then marked expired.
    /// Members already in the ledger for this expiry date are skipped.
    ///
    /// # Returns
    /// - `Ok(ExpiryReportDto)` - Run completed, possibly with per-member failures
    /// - `Err(AppError)` - Candidate members or the ledger could not be read
    pub async fn run(&self) -> Result<ExpiryReportDto, AppError> {
        let now = self.clock.now();
        let calendar = ExpiryCalendar::at(now, self.settings.timezone, self.settings.warning_days);

        tracing::info!(
            "Checking memberships: today {}, warning date {}",
            calendar.today,
            calendar.warning_date
        );

        let candidates = MemberRepository::new(self.db)
            .find_active_expiring_on(&[calendar.today, calendar.warning_date])
            .await?;
        let classified = classify(candidates, calendar);
        let found_warning = classified.warning.len();
        let found_expiring = classified.expiring.len();

        let mut log = RunLog::default();

        let warning = self
            .pending(
                classified.warning,
                NotificationKind::Warning,
                calendar.warning_date,
                now,
                &mut log,
            )
            .await?;
        let expiring = self
            .pending(
                classified.expiring,
                NotificationKind::Expiry,
                calendar.today,
                now,
                &mut log,
            )
            .await?;

        let mut batches = Vec::new();
        for (members, kind) in [
            (warning, NotificationKind::Warning),
            (expiring, NotificationKind::Expiry),
        ] {
            let notifications = self.render_all(members, kind, &mut log);
            batches.extend(batch::pack(notifications, MAX_BATCH_SIZE));
        }

        let mut dispatcher =
            BatchDispatcher::new(self.mailer, self.settings.retry, self.settings.batch_pause);
        for batch in batches {
            match dispatcher.dispatch(&batch).await {
                Ok(_) => {
                    for notification in &batch {
                        self.confirm(notification, now, &mut log).await;
                    }
                }
                Err(err) => {
                    let reason = err.to_string();
                    for notification in &batch {
                        log.fail(&notification.member, notification.kind, reason.clone());
                    }
                }
            }
        }

        tracing::info!(
            "Membership check finished: {} warnings sent, {} expiry notices sent, {} skipped, {} failed",
            log.warning_sent.len(),
            log.expiry_sent.len(),
            log.skipped,
            log.failed.len()
        );

        Ok(ExpiryReportDto {
            success: true,
            message: format!(
                "Checked memberships. Found {} expiring in {} days, {} expiring today.",
                found_warning, self.settings.warning_days, found_expiring
            ),
            today: iso_date(calendar.today),
            warning_date: iso_date(calendar.warning_date),
            warning_sent: log.warning_sent.len(),
            expiry_sent: log.expiry_sent.len(),
            skipped: log.skipped,
            warning_notifications: log.warning_sent,
            expiry_notifications: log.expiry_sent,
            failed: (!log.failed.is_empty()).then_some(log.failed),
            timestamp: now,
        })
    }

    /// Drops members already notified for `expiry_date`.
    ///
    /// An expiring member found in the ledger but still active is marked expired
    /// without a second email.
    async fn pending(
        &self,
        members: Vec<Member>,
        kind: NotificationKind,
        expiry_date: NaiveDate,
        now: DateTime<Utc>,
        log: &mut RunLog,
    ) -> Result<Vec<Member>, AppError> {
        let ids: Vec<i32> = members.iter().map(|m| m.id).collect();
        let notified = NotificationRepository::new(self.db)
            .notified_member_ids(kind, expiry_date, &ids)
            .await?;

        let mut pending = Vec::with_capacity(members.len());
        for member in members {
            if !notified.contains(&member.id) {
                pending.push(member);
                continue;
            }

            log.skipped += 1;
            if kind == NotificationKind::Expiry {
                tracing::info!(
                    "Member {} was already notified of expiry, updating status",
                    member.id
                );
                if let Err(err) = self.mark_expired(&member, now).await {
                    log.fail(&member, kind, format!("status update failed: {}", err));
                }
            }
        }

        Ok(pending)
    }

    fn render_all(
        &self,
        members: Vec<Member>,
        kind: NotificationKind,
        log: &mut RunLog,
    ) -> Vec<Notification> {
        let mut notifications = Vec::with_capacity(members.len());
        for member in members {
            match self.render(&member, kind) {
                Ok(messages) => notifications.push(Notification {
                    member,
                    kind,
                    messages,
                }),
                Err(err) => {
                    tracing::error!("Failed to render email for member {}: {}", member.id, err);
                    log.fail(&member, kind, err.to_string());
                }
            }
        }
        notifications
    }

    fn render(
        &self,
        member: &Member,
        kind: NotificationKind,
    ) -> Result<Vec<EmailMessage>, MailError> {
        match kind {
            NotificationKind::Warning => Ok(vec![ExpiryWarningEmail::for_member(
                member,
                self.settings.warning_days,
            )
            .to_message(&member.email)?]),
            NotificationKind::Expiry => Ok(vec![
                MembershipExpiredEmail::for_member(member).to_message(&member.email)?,
                FounderExpiryNotice::for_member(member).to_message(&self.settings.founder_email)?,
            ]),
        }
    }

    /// Records a confirmed notification and applies its status change.
    async fn confirm(&self, notification: &Notification, now: DateTime<Utc>, log: &mut RunLog) {
        let member = &notification.member;
        log.sent(member, notification.kind);

        if let Err(err) = NotificationRepository::new(self.db)
            .record(member.id, notification.kind, member.expiry_date, now)
            .await
        {
            tracing::error!("Failed to record notification for member {}: {}", member.id, err);
            log.fail(member, notification.kind, format!("ledger write failed: {}", err));
        }

        if notification.kind == NotificationKind::Expiry {
            if let Err(err) = self.mark_expired(member, now).await {
                tracing::error!("Failed to mark member {} expired: {}", member.id, err);
                log.fail(member, notification.kind, format!("status update failed: {}", err));
            }
        }
    }

    async fn mark_expired(&self, member: &Member, now: DateTime<Utc>) -> Result<(), AppError> {
        MemberRepository::new(self.db)
            .mark_expired(member.id, now)
            .await
            .map(|_| ())
    }
}
