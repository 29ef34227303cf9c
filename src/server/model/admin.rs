use chrono::{DateTime, Utc};

use crate::model::admin::AdminDto;

/// An email address granted access to the admin panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    /// Email of the admin who granted access, or `system` for the seeded admin.
    pub granted_by: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn into_dto(self) -> AdminDto {
        AdminDto {
            id: self.id,
            email: self.email,
            granted_by: self.granted_by,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::admin::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            granted_by: entity.granted_by,
            created_at: entity.created_at,
        }
    }
}
