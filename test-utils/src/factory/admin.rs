//! Admin factory for granting administrator access in tests.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts an admin row for `email`, granted by `"system"`.
///
/// # Arguments
/// - `db` - Database connection
/// - `email` - Email address to grant administrator access to
///
/// # Returns
/// - `Ok(entity::admin::Model)` - Created admin entity
/// - `Err(DbErr)` - Database error during insert (including duplicate email)
pub async fn create_admin(
    db: &DatabaseConnection,
    email: impl Into<String>,
) -> Result<entity::admin::Model, DbErr> {
    entity::admin::ActiveModel {
        email: ActiveValue::Set(email.into()),
        granted_by: ActiveValue::Set("system".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
