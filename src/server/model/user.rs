//! User account domain models and parameters.

use chrono::{DateTime, Utc};

use crate::model::auth::UserProfileDto;

/// A registered account. Profile fields live here rather than in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    /// Lowercased email, unique across users.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Converts into the profile DTO; admin status is resolved by the caller.
    pub fn into_profile_dto(self, is_admin: bool) -> UserProfileDto {
        UserProfileDto {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            avatar_url: self.avatar_url,
            is_admin,
        }
    }

    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            first_name: entity.first_name,
            last_name: entity.last_name,
            avatar_url: entity.avatar_url,
            created_at: entity.created_at,
        }
    }
}

/// Parameters for inserting a user. Email must already be normalized.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile fields to change; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileParam {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A pending or consumed password reset request.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetToken {
    pub id: i32,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordResetToken {
    /// Whether the token may still be redeemed at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && now < self.expires_at
    }

    pub fn from_entity(entity: entity::password_reset_token::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            expires_at: entity.expires_at,
            used_at: entity.used_at,
        }
    }
}
