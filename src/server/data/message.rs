//! Contact message repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::message::{ContactMessage, CreateMessageParam, MessageStatus},
};

pub struct MessageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MessageRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a contact form submission as `unread`.
    pub async fn create(&self, param: CreateMessageParam) -> Result<ContactMessage, AppError> {
        let entity = entity::message::ActiveModel {
            name: ActiveValue::Set(param.name),
            email: ActiveValue::Set(param.email),
            phone: ActiveValue::Set(param.phone),
            message: ActiveValue::Set(param.message),
            status: ActiveValue::Set(MessageStatus::Unread.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        ContactMessage::from_entity(entity)
    }

    /// Gets all messages, newest first.
    pub async fn get_all(&self) -> Result<Vec<ContactMessage>, AppError> {
        entity::prelude::Message::find()
            .order_by_desc(entity::message::Column::CreatedAt)
            .order_by_desc(entity::message::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(ContactMessage::from_entity)
            .collect()
    }

    /// Sets a message's read status.
    ///
    /// # Returns
    /// - `Ok(Some(ContactMessage))` - The updated message
    /// - `Ok(None)` - No message with that id
    pub async fn update_status(
        &self,
        id: i32,
        status: MessageStatus,
    ) -> Result<Option<ContactMessage>, AppError> {
        let Some(existing) = entity::prelude::Message::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::message::ActiveModel = existing.into();
        active.status = ActiveValue::Set(status.as_str().to_string());
        let updated = active.update(self.db).await?;

        ContactMessage::from_entity(updated).map(Some)
    }
}
