//! Member domain models and parameters.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    model::member::MemberDto,
    server::error::{internal::InternalError, AppError},
};

/// Lifecycle state of a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Active,
    Expired,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }

    /// Status implied by an expiry date: a membership stays active through its
    /// expiry day.
    pub fn for_expiry(expiry_date: NaiveDate, today: NaiveDate) -> Self {
        if expiry_date >= today {
            Self::Active
        } else {
            Self::Expired
        }
    }

    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            other => Err(InternalError::UnknownStatus {
                entity: "member",
                value: other.to_string(),
            }),
        }
    }
}

/// A club membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub start_date: NaiveDate,
    /// Last day the membership is valid, as a civil date in the club timezone.
    pub expiry_date: NaiveDate,
    pub status: MemberStatus,
    pub membership_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn into_dto(self) -> MemberDto {
        MemberDto {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            start_date: self.start_date,
            expiry_date: self.expiry_date,
            status: self.status.as_str().to_string(),
            membership_type: self.membership_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Converts an entity model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Member)` - The converted member
    /// - `Err(AppError::Internal(UnknownStatus))` - Stored status is not recognised
    pub fn from_entity(entity: entity::member::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            start_date: entity.start_date,
            expiry_date: entity.expiry_date,
            status: MemberStatus::parse(&entity.status)?,
            membership_type: entity.membership_type,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Parameters for inserting a member.
#[derive(Debug, Clone)]
pub struct CreateMemberParam {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: MemberStatus,
    pub membership_type: Option<String>,
}
