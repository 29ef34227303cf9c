use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Tables are generated from the SeaORM entities with SQLite syntax and created in the
/// order they were added, so tables holding foreign keys must come after the tables
/// they reference.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
///
/// let test = TestBuilder::new()
///     .with_member_tables()
///     .with_auth_tables()
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity implementing `EntityTrait` to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the tables used by membership tracking and the expiry job.
    ///
    /// Adds `member` followed by the `membership_notification` ledger that references it.
    pub fn with_member_tables(self) -> Self {
        self.with_table(Member).with_table(MembershipNotification)
    }

    /// Adds the tables used by authentication and account management.
    ///
    /// Adds `user`, `admin` and `password_reset_token`.
    pub fn with_auth_tables(self) -> Self {
        self.with_table(User)
            .with_table(Admin)
            .with_table(PasswordResetToken)
    }

    /// Adds every table in the schema.
    pub fn with_all_tables(self) -> Self {
        self.with_auth_tables()
            .with_member_tables()
            .with_table(Message)
    }

    /// Builds the test context and creates all configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with an in-memory database holding the tables
    /// - `Err(TestError::Database)` - Failed to connect or to create a table
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new();

        context.with_tables(self.tables).await?;

        Ok(context)
    }
}
