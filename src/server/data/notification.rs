//! Repository for the membership notification ledger.
//!
//! A ledger row records that the provider confirmed an expiry email for a member and
//! expiry date. The expiry job consults it so re-runs never notify a member twice.

use chrono::{DateTime, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};
use std::collections::HashSet;

use crate::server::model::notification::NotificationKind;

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Returns which of `member_ids` already have a `kind` notification for `expiry_date`.
    pub async fn notified_member_ids(
        &self,
        kind: NotificationKind,
        expiry_date: NaiveDate,
        member_ids: &[i32],
    ) -> Result<HashSet<i32>, DbErr> {
        if member_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = entity::prelude::MembershipNotification::find()
            .filter(entity::membership_notification::Column::Kind.eq(kind.as_str()))
            .filter(entity::membership_notification::Column::ExpiryDate.eq(expiry_date))
            .filter(
                entity::membership_notification::Column::MemberId
                    .is_in(member_ids.iter().copied()),
            )
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|row| row.member_id).collect())
    }

    /// Records a confirmed notification.
    pub async fn record(
        &self,
        member_id: i32,
        kind: NotificationKind,
        expiry_date: NaiveDate,
        sent_at: DateTime<chrono::Utc>,
    ) -> Result<(), DbErr> {
        entity::membership_notification::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            expiry_date: ActiveValue::Set(expiry_date),
            sent_at: ActiveValue::Set(sent_at),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Removes all ledger rows for a member.
    pub async fn delete_by_member(&self, member_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::MembershipNotification::delete_many()
            .filter(entity::membership_notification::Column::MemberId.eq(member_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
