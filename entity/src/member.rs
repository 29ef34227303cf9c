use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub start_date: Date,
    pub expiry_date: Date,
    /// `active` or `expired`
    pub status: String,
    pub membership_type: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::membership_notification::Entity")]
    MembershipNotification,
}

impl Related<super::membership_notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MembershipNotification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
