//! Member data repository.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::member::{CreateMemberParam, Member, MemberStatus},
};

/// Repository providing database operations for memberships.
pub struct MemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a member with `created_at` and `updated_at` set to now.
    ///
    /// # Returns
    /// - `Ok(Member)` - The created member
    /// - `Err(AppError::DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateMemberParam) -> Result<Member, AppError> {
        let now = Utc::now();
        let entity = entity::member::ActiveModel {
            first_name: ActiveValue::Set(param.first_name),
            last_name: ActiveValue::Set(param.last_name),
            email: ActiveValue::Set(param.email),
            start_date: ActiveValue::Set(param.start_date),
            expiry_date: ActiveValue::Set(param.expiry_date),
            status: ActiveValue::Set(param.status.as_str().to_string()),
            membership_type: ActiveValue::Set(param.membership_type),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Member::from_entity(entity)
    }

    /// Gets all members, soonest expiry first.
    pub async fn get_all(&self) -> Result<Vec<Member>, AppError> {
        entity::prelude::Member::find()
            .order_by_asc(entity::member::Column::ExpiryDate)
            .order_by_asc(entity::member::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Member::from_entity)
            .collect()
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Member>, AppError> {
        entity::prelude::Member::find_by_id(id)
            .one(self.db)
            .await?
            .map(Member::from_entity)
            .transpose()
    }

    /// Finds the most recently created membership for an email address.
    ///
    /// Member emails are stored lowercased, so `email` is lowercased before comparing.
    pub async fn find_latest_by_email(&self, email: &str) -> Result<Option<Member>, AppError> {
        entity::prelude::Member::find()
            .filter(entity::member::Column::Email.eq(email.to_lowercase()))
            .order_by_desc(entity::member::Column::CreatedAt)
            .order_by_desc(entity::member::Column::Id)
            .one(self.db)
            .await?
            .map(Member::from_entity)
            .transpose()
    }

    /// Gets active members whose expiry date is one of `dates`.
    ///
    /// Used by the expiry job to narrow the member set before classification.
    pub async fn find_active_expiring_on(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<Member>, AppError> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Member::find()
            .filter(entity::member::Column::ExpiryDate.is_in(dates.iter().copied()))
            .filter(entity::member::Column::Status.eq(MemberStatus::Active.as_str()))
            .order_by_asc(entity::member::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Member::from_entity)
            .collect()
    }

    /// Sets a new expiry date together with the status it implies.
    ///
    /// # Returns
    /// - `Ok(Some(Member))` - The updated member
    /// - `Ok(None)` - No member with that id
    /// - `Err(AppError::DbErr)` - Database error during update
    pub async fn update_expiry(
        &self,
        id: i32,
        expiry_date: NaiveDate,
        status: MemberStatus,
    ) -> Result<Option<Member>, AppError> {
        let Some(existing) = entity::prelude::Member::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::member::ActiveModel = existing.into();
        active.expiry_date = ActiveValue::Set(expiry_date);
        active.status = ActiveValue::Set(status.as_str().to_string());
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(self.db).await?;

        Member::from_entity(updated).map(Some)
    }

    /// Transitions an active member to `expired`.
    ///
    /// Members that are already expired are left untouched, so the transition
    /// happens at most once.
    ///
    /// # Returns
    /// - `Ok(true)` - The member was active and is now expired
    /// - `Ok(false)` - No active member with that id
    /// - `Err(AppError::DbErr)` - Database error during update
    pub async fn mark_expired(&self, id: i32, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = entity::prelude::Member::update_many()
            .filter(entity::member::Column::Id.eq(id))
            .filter(entity::member::Column::Status.eq(MemberStatus::Active.as_str()))
            .col_expr(
                entity::member::Column::Status,
                Expr::value(MemberStatus::Expired.as_str()),
            )
            .col_expr(entity::member::Column::UpdatedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes a member by id. Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = entity::prelude::Member::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes every membership registered to an email address.
    pub async fn delete_by_email(&self, email: &str) -> Result<u64, AppError> {
        let result = entity::prelude::Member::delete_many()
            .filter(entity::member::Column::Email.eq(email.to_lowercase()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
