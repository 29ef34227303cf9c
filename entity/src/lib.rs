//! SeaORM entity models for the club portal database.

pub mod prelude;

pub mod admin;
pub mod member;
pub mod membership_notification;
pub mod message;
pub mod password_reset_token;
pub mod user;
