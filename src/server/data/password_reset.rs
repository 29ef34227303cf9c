//! Password reset token repository.
//!
//! Only SHA-256 digests of the emailed tokens are stored, so a leaked database cannot
//! be used to reset passwords.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::user::PasswordResetToken;

pub struct PasswordResetRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PasswordResetRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a new token digest for a user.
    pub async fn create(
        &self,
        user_id: i32,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, DbErr> {
        let entity = entity::password_reset_token::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            token_hash: ActiveValue::Set(token_hash),
            expires_at: ActiveValue::Set(expires_at),
            used_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(PasswordResetToken::from_entity(entity))
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, DbErr> {
        let entity = entity::prelude::PasswordResetToken::find()
            .filter(entity::password_reset_token::Column::TokenHash.eq(token_hash))
            .one(self.db)
            .await?;

        Ok(entity.map(PasswordResetToken::from_entity))
    }

    /// Marks a token as redeemed so it cannot be used again.
    pub async fn mark_used(&self, id: i32, used_at: DateTime<Utc>) -> Result<(), DbErr> {
        let Some(existing) = entity::prelude::PasswordResetToken::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(());
        };

        let mut active: entity::password_reset_token::ActiveModel = existing.into();
        active.used_at = ActiveValue::Set(Some(used_at));
        active.update(self.db).await?;

        Ok(())
    }

    /// Invalidates every outstanding token of a user, e.g. after a successful reset.
    pub async fn expire_all_for_user(&self, user_id: i32, now: DateTime<Utc>) -> Result<(), DbErr> {
        entity::prelude::PasswordResetToken::update_many()
            .filter(entity::password_reset_token::Column::UserId.eq(user_id))
            .filter(entity::password_reset_token::Column::UsedAt.is_null())
            .col_expr(
                entity::password_reset_token::Column::UsedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }
}
