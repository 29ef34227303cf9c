//! HTTP request handlers.
//!
//! Controllers check access, apply rate limits, call a service and convert the
//! resulting domain models into DTOs. Every handler carries a `utoipa::path`
//! annotation and is registered in `router`.

pub mod admin;
pub mod auth;
pub mod cron;
pub mod member;
pub mod message;
pub mod profile;

#[cfg(test)]
mod test;
