use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::auth::UpdateProfileDto,
    server::{
        data::{admin::AdminRepository, member::MemberRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        model::user::{UpdateProfileParam, User},
        util::validate::{required_text, sanitize_text},
    },
};

pub struct ProfileService<'a> {
    db: &'a DatabaseConnection,
    primary_admin_email: Option<&'a str>,
}

impl<'a> ProfileService<'a> {
    pub fn new(db: &'a DatabaseConnection, primary_admin_email: Option<&'a str>) -> Self {
        Self {
            db,
            primary_admin_email,
        }
    }

    /// Applies a partial update to the user's profile.
    ///
    /// Names may not be blanked; an empty avatar URL is ignored.
    pub async fn update(&self, user: &User, payload: UpdateProfileDto) -> Result<User, AppError> {
        let param = UpdateProfileParam {
            first_name: payload
                .first_name
                .map(|v| required_text("First name", &v))
                .transpose()?,
            last_name: payload
                .last_name
                .map(|v| required_text("Last name", &v))
                .transpose()?,
            avatar_url: payload
                .avatar_url
                .map(|v| sanitize_text(&v))
                .filter(|v| !v.is_empty()),
        };

        UserRepository::new(self.db)
            .update_profile(user.id, param)
            .await?
            .ok_or_else(|| AuthError::UserNotInDatabase(user.id).into())
    }

    /// Deletes the account, its memberships and any admin access.
    ///
    /// # Returns
    /// - `Ok(())` - Everything removed
    /// - `Err(AppError::Forbidden)` - The primary admin cannot delete their account
    pub async fn delete(&self, user: &User) -> Result<(), AppError> {
        if self.primary_admin_email == Some(user.email.as_str()) {
            return Err(AppError::Forbidden(
                "The primary admin account cannot be deleted".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let members = MemberRepository::new(&txn).delete_by_email(&user.email).await?;
        AdminRepository::new(&txn).delete_by_email(&user.email).await?;
        UserRepository::new(&txn).delete(user.id).await?;
        txn.commit().await?;

        tracing::info!(
            "Deleted account {} with {} membership rows",
            user.id,
            members
        );
        Ok(())
    }
}
