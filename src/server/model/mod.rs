//! Domain models and operation parameters.
//!
//! Repositories convert SeaORM entities into these types at the data-layer boundary.
//! Controllers convert them into DTOs with `into_dto()`.

pub mod admin;
pub mod member;
pub mod message;
pub mod notification;
pub mod user;
