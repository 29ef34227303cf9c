//! Admin data repository.
//!
//! Admin access is keyed by email, so an address can be granted access before its
//! owner registers.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::admin::Admin;

pub struct AdminRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AdminRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets all admins, oldest grant first.
    pub async fn get_all(&self) -> Result<Vec<Admin>, DbErr> {
        let entities = entity::prelude::Admin::find()
            .order_by_asc(entity::admin::Column::CreatedAt)
            .order_by_asc(entity::admin::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Admin::from_entity).collect())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DbErr> {
        let entity = entity::prelude::Admin::find()
            .filter(entity::admin::Column::Email.eq(email.to_lowercase()))
            .one(self.db)
            .await?;

        Ok(entity.map(Admin::from_entity))
    }

    /// Checks whether an email has admin access.
    pub async fn is_admin(&self, email: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Admin::find()
            .filter(entity::admin::Column::Email.eq(email.to_lowercase()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks whether any admin exists at all.
    pub async fn any_exists(&self) -> Result<bool, DbErr> {
        let count = entity::prelude::Admin::find().count(self.db).await?;

        Ok(count > 0)
    }

    /// Grants admin access to an email.
    ///
    /// # Returns
    /// - `Ok(Admin)` - The created admin row
    /// - `Err(DbErr)` - Database error, including a unique violation if already granted
    pub async fn create(&self, email: &str, granted_by: &str) -> Result<Admin, DbErr> {
        let entity = entity::admin::ActiveModel {
            email: ActiveValue::Set(email.to_lowercase()),
            granted_by: ActiveValue::Set(granted_by.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Admin::from_entity(entity))
    }

    /// Revokes admin access. Returns whether a row was removed.
    pub async fn delete_by_email(&self, email: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::Admin::delete_many()
            .filter(entity::admin::Column::Email.eq(email.to_lowercase()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
