//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. They validate input,
//! apply the club's rules and coordinate repository calls and outgoing email.
//! They work with domain models, never with entity models.

pub mod admin;
pub mod auth;
pub mod expiry;
pub mod member;
pub mod message;
pub mod password_reset;
pub mod profile;

#[cfg(test)]
mod test;
