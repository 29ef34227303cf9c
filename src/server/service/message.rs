use sea_orm::DatabaseConnection;

use crate::{
    model::message::CreateMessageDto,
    server::{
        data::message::MessageRepository,
        error::AppError,
        model::message::{ContactMessage, CreateMessageParam, MessageStatus},
        util::validate::{normalize_email, required_text, sanitize_message, sanitize_text},
    },
};

pub struct MessageService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MessageService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a contact form submission as unread.
    ///
    /// # Returns
    /// - `Ok(ContactMessage)` - The stored message
    /// - `Err(AppError::BadRequest)` - Missing name or message, or invalid email
    pub async fn submit(&self, payload: CreateMessageDto) -> Result<ContactMessage, AppError> {
        let message = sanitize_message(&payload.message);
        if message.is_empty() {
            return Err(AppError::BadRequest("Message is required".to_string()));
        }

        let param = CreateMessageParam {
            name: required_text("Name", &payload.name)?,
            email: normalize_email(&payload.email)?,
            phone: payload
                .phone
                .map(|p| sanitize_text(&p))
                .filter(|p| !p.is_empty()),
            message,
        };

        MessageRepository::new(self.db).create(param).await
    }

    /// All messages, newest first.
    pub async fn get_all(&self) -> Result<Vec<ContactMessage>, AppError> {
        MessageRepository::new(self.db).get_all().await
    }

    /// Marks a message read or unread.
    ///
    /// # Returns
    /// - `Ok(ContactMessage)` - The updated message
    /// - `Err(AppError::BadRequest)` - Status is neither `read` nor `unread`
    /// - `Err(AppError::NotFound)` - No message with that id
    pub async fn set_status(&self, id: i32, status: &str) -> Result<ContactMessage, AppError> {
        let status = MessageStatus::parse(status)
            .map_err(|_| AppError::BadRequest("Status must be 'read' or 'unread'".to_string()))?;

        MessageRepository::new(self.db)
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))
    }
}
