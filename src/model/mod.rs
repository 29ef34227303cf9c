//! Request and response DTOs shared by the HTTP API.

pub mod admin;
pub mod api;
pub mod auth;
pub mod expiry;
pub mod member;
pub mod message;
