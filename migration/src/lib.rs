pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_admin_table;
mod m20250101_000003_create_member_table;
mod m20250101_000004_create_message_table;
mod m20250102_000005_create_password_reset_token_table;
mod m20250110_000006_create_membership_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_admin_table::Migration),
            Box::new(m20250101_000003_create_member_table::Migration),
            Box::new(m20250101_000004_create_message_table::Migration),
            Box::new(m20250102_000005_create_password_reset_token_table::Migration),
            Box::new(m20250110_000006_create_membership_notification_table::Migration),
        ]
    }
}
