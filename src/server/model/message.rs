//! Contact form message models.

use chrono::{DateTime, Utc};

use crate::{
    model::message::MessageDto,
    server::error::{internal::InternalError, AppError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Unread,
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            other => Err(InternalError::UnknownStatus {
                entity: "message",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn into_dto(self) -> MessageDto {
        MessageDto {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::message::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            message: entity.message,
            status: MessageStatus::parse(&entity.status)?,
            created_at: entity.created_at,
        })
    }
}

/// Sanitized contact form submission.
#[derive(Debug, Clone)]
pub struct CreateMessageParam {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}
