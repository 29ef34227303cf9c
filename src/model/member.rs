use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    /// `active` or `expired`
    pub status: String,
    pub membership_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub membership_type: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberExpiryDto {
    pub expiry_date: NaiveDate,
}
