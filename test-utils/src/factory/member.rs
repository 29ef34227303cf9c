//! Member factory for creating membership rows.

use crate::factory::helpers::next_id;
use chrono::{Months, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test members with customizable fields.
///
/// Defaults to an `active` monthly membership that started on 2025-01-01 and
/// expires one month later.
///
/// # Example
///
/// ```rust,ignore
/// let member = MemberFactory::new(&db)
///     .name("Ana", "Petrović")
///     .expiry_date(NaiveDate::from_ymd_opt(2025, 1, 13).unwrap())
///     .build()
///     .await?;
/// ```
pub struct MemberFactory<'a> {
    db: &'a DatabaseConnection,
    first_name: String,
    last_name: String,
    email: String,
    start_date: NaiveDate,
    expiry_date: NaiveDate,
    status: String,
    membership_type: Option<String>,
}

impl<'a> MemberFactory<'a> {
    /// Creates a new MemberFactory with default values.
    ///
    /// Defaults:
    /// - first_name / last_name: `"Member"` / `"{id}"`
    /// - email: `"member{id}@example.com"`
    /// - start_date: 2025-01-01, expiry_date: 2025-02-01
    /// - status: `"active"`, membership_type: `"monthly"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
        Self {
            db,
            first_name: "Member".to_string(),
            last_name: id.to_string(),
            email: format!("member{}@example.com", id),
            start_date,
            expiry_date: start_date + Months::new(1),
            status: "active".to_string(),
            membership_type: Some("monthly".to_string()),
        }
    }

    /// Sets the first and last name.
    pub fn name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Sets the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the start date.
    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Sets the expiry date.
    pub fn expiry_date(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = expiry_date;
        self
    }

    /// Sets the status, `"active"` or `"expired"`.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the membership type.
    pub fn membership_type(mut self, membership_type: Option<String>) -> Self {
        self.membership_type = membership_type;
        self
    }

    /// Builds and inserts the member.
    ///
    /// # Returns
    /// - `Ok(entity::member::Model)` - Created member entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::member::Model, DbErr> {
        let now = Utc::now();
        entity::member::ActiveModel {
            first_name: ActiveValue::Set(self.first_name),
            last_name: ActiveValue::Set(self.last_name),
            email: ActiveValue::Set(self.email),
            start_date: ActiveValue::Set(self.start_date),
            expiry_date: ActiveValue::Set(self.expiry_date),
            status: ActiveValue::Set(self.status),
            membership_type: ActiveValue::Set(self.membership_type),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a member with default values.
pub async fn create_member(db: &DatabaseConnection) -> Result<entity::member::Model, DbErr> {
    MemberFactory::new(db).build().await
}

/// Creates an active member whose membership expires on `expiry_date`.
pub async fn create_member_expiring_on(
    db: &DatabaseConnection,
    expiry_date: NaiveDate,
) -> Result<entity::member::Model, DbErr> {
    MemberFactory::new(db).expiry_date(expiry_date).build().await
}
