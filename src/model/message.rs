use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    /// `unread` or `read`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form submission.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateMessageDto {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateMessageStatusDto {
    pub status: String,
}
