//! Database repository layer.
//!
//! Repositories wrap SeaORM queries for one table each and convert entity models
//! into domain models at this boundary. They are generic over `ConnectionTrait` so
//! the same repository works on a pooled connection or inside a transaction.

pub mod admin;
pub mod member;
pub mod message;
pub mod notification;
pub mod password_reset;
pub mod user;

#[cfg(test)]
mod test;
