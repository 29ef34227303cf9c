//! Contact message factory.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts an `unread` contact message from a generated sender.
pub async fn create_message(db: &DatabaseConnection) -> Result<entity::message::Model, DbErr> {
    let id = next_id();
    entity::message::ActiveModel {
        name: ActiveValue::Set(format!("Sender {}", id)),
        email: ActiveValue::Set(format!("sender{}@example.com", id)),
        phone: ActiveValue::Set(None),
        message: ActiveValue::Set("Kada su treninzi za početnike?".to_string()),
        status: ActiveValue::Set("unread".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
