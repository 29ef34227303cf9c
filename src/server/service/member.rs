use chrono::{DateTime, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::member::CreateMemberDto,
    server::{
        data::{member::MemberRepository, notification::NotificationRepository},
        error::AppError,
        model::member::{CreateMemberParam, Member, MemberStatus},
        util::validate::{normalize_email, required_text, sanitize_text},
    },
};

/// Last day of a membership starting on `start_date`: one calendar month later,
/// clamped to the end of shorter months (`2025-01-31` gives `2025-02-28`).
pub fn membership_expiry(start_date: NaiveDate) -> Option<NaiveDate> {
    start_date.checked_add_months(Months::new(1))
}

pub struct MemberService<'a> {
    db: &'a DatabaseConnection,
    timezone: Tz,
}

impl<'a> MemberService<'a> {
    /// # Arguments
    /// - `db` - Database connection
    /// - `timezone` - Club timezone used to decide whether an expiry date has passed
    pub fn new(db: &'a DatabaseConnection, timezone: Tz) -> Self {
        Self { db, timezone }
    }

    /// All members, soonest expiry first.
    pub async fn get_all(&self) -> Result<Vec<Member>, AppError> {
        MemberRepository::new(self.db).get_all().await
    }

    /// Registers an active monthly membership.
    ///
    /// # Returns
    /// - `Ok(Member)` - The created member
    /// - `Err(AppError::BadRequest)` - Missing name or invalid email
    pub async fn create(&self, payload: CreateMemberDto) -> Result<Member, AppError> {
        let expiry_date = membership_expiry(payload.start_date)
            .ok_or_else(|| AppError::BadRequest("Invalid start date".to_string()))?;

        let param = CreateMemberParam {
            first_name: required_text("First name", &payload.first_name)?,
            last_name: required_text("Last name", &payload.last_name)?,
            email: normalize_email(&payload.email)?,
            start_date: payload.start_date,
            expiry_date,
            status: MemberStatus::Active,
            membership_type: payload
                .membership_type
                .map(|t| sanitize_text(&t))
                .filter(|t| !t.is_empty()),
        };

        MemberRepository::new(self.db).create(param).await
    }

    /// Moves a membership's expiry date and recomputes its status.
    ///
    /// The member stays active through the new expiry day, judged by the club's
    /// calendar at `now`.
    ///
    /// # Returns
    /// - `Ok(Member)` - The updated member
    /// - `Err(AppError::NotFound)` - No member with that id
    pub async fn update_expiry(
        &self,
        id: i32,
        expiry_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Member, AppError> {
        let today = now.with_timezone(&self.timezone).date_naive();
        let status = MemberStatus::for_expiry(expiry_date, today);

        MemberRepository::new(self.db)
            .update_expiry(id, expiry_date, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    /// Deletes a member together with its notification history.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        NotificationRepository::new(&txn).delete_by_member(id).await?;
        let deleted = MemberRepository::new(&txn).delete(id).await?;

        if !deleted {
            txn.rollback().await?;
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        txn.commit().await?;
        Ok(())
    }

    /// Newest membership registered to `email`, if any.
    pub async fn find_for_email(&self, email: &str) -> Result<Option<Member>, AppError> {
        MemberRepository::new(self.db).find_latest_by_email(email).await
    }
}
