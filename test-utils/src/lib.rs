//! Club Portal Test Utils
//!
//! Shared testing utilities for the club portal. Provides a builder for test contexts
//! backed by in-memory SQLite databases, plus factories that insert rows with sensible
//! defaults.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Row factories for members, users, admins and contact messages
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn finds_member() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_member_tables().build().await?;
//!     let db = test.db.as_ref().unwrap();
//!
//!     let member = factory::member::create_member(db).await?;
//!     // ...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
