use sea_orm_migration::{prelude::*, schema::*};

use super::m20250101_000003_create_member_table::Member;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MembershipNotification::Table)
                    .if_not_exists()
                    .col(pk_auto(MembershipNotification::Id))
                    .col(integer(MembershipNotification::MemberId))
                    .col(string(MembershipNotification::Kind))
                    .col(date(MembershipNotification::ExpiryDate))
                    .col(timestamp_with_time_zone(MembershipNotification::SentAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_membership_notification_member_id")
                            .from(
                                MembershipNotification::Table,
                                MembershipNotification::MemberId,
                            )
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A member is notified at most once per kind for a given expiry date
        manager
            .create_index(
                Index::create()
                    .name("idx_membership_notification_unique")
                    .table(MembershipNotification::Table)
                    .col(MembershipNotification::MemberId)
                    .col(MembershipNotification::Kind)
                    .col(MembershipNotification::ExpiryDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MembershipNotification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MembershipNotification {
    Table,
    Id,
    MemberId,
    Kind,
    ExpiryDate,
    SentAt,
}
