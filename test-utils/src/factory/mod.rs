//! Factory methods for creating test data.
//!
//! Each entity has a `*Factory` builder for customization and a `create_*` shorthand
//! for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let member = factory::member::MemberFactory::new(&db)
//!     .email("ana@example.com")
//!     .expiry_date(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
//!     .build()
//!     .await?;
//!
//! let admin = factory::create_admin(&db, "owner@gard018.com").await?;
//! ```

pub mod admin;
pub mod helpers;
pub mod member;
pub mod message;
pub mod user;

pub use admin::create_admin;
pub use member::{create_member, create_member_expiring_on};
pub use message::create_message;
pub use user::create_user;
