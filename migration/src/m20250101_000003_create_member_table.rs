use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(pk_auto(Member::Id))
                    .col(string(Member::FirstName))
                    .col(string(Member::LastName))
                    .col(string(Member::Email))
                    .col(date(Member::StartDate))
                    .col(date(Member::ExpiryDate))
                    .col(string(Member::Status).default("active"))
                    .col(string_null(Member::MembershipType))
                    .col(timestamp_with_time_zone(Member::CreatedAt))
                    .col(timestamp_with_time_zone(Member::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // The expiry job looks members up by date every night
        manager
            .create_index(
                Index::create()
                    .name("idx_member_expiry_date")
                    .table(Member::Table)
                    .col(Member::ExpiryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_member_email")
                    .table(Member::Table)
                    .col(Member::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Member {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    StartDate,
    ExpiryDate,
    Status,
    MembershipType,
    CreatedAt,
    UpdatedAt,
}
