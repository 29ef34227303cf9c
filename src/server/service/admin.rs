use sea_orm::DatabaseConnection;

use crate::server::{
    data::admin::AdminRepository,
    error::AppError,
    model::{admin::Admin, user::User},
    util::validate::normalize_email,
};

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
    primary_admin_email: Option<&'a str>,
}

impl<'a> AdminService<'a> {
    /// # Arguments
    /// - `db` - Database connection
    /// - `primary_admin_email` - Lowercased address of the admin that can never be removed
    pub fn new(db: &'a DatabaseConnection, primary_admin_email: Option<&'a str>) -> Self {
        Self {
            db,
            primary_admin_email,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Admin>, AppError> {
        Ok(AdminRepository::new(self.db).get_all().await?)
    }

    /// Grants admin access to `email` on behalf of `granted_by`.
    ///
    /// # Returns
    /// - `Ok(Admin)` - The new admin row
    /// - `Err(AppError::BadRequest)` - Invalid email
    /// - `Err(AppError::Conflict)` - Email is already an admin
    pub async fn grant(&self, email: &str, granted_by: &User) -> Result<Admin, AppError> {
        let email = normalize_email(email)?;
        let repo = AdminRepository::new(self.db);

        if repo.is_admin(&email).await? {
            return Err(AppError::Conflict("Admin already exists".to_string()));
        }

        let admin = repo.create(&email, &granted_by.email).await?;
        tracing::info!("{} granted admin access to {}", granted_by.email, admin.email);

        Ok(admin)
    }

    /// Revokes admin access.
    ///
    /// # Returns
    /// - `Ok(())` - Access revoked
    /// - `Err(AppError::Forbidden)` - `email` is the primary admin
    /// - `Err(AppError::BadRequest)` - Caller tried to remove themselves
    /// - `Err(AppError::NotFound)` - `email` is not an admin
    pub async fn revoke(&self, email: &str, caller: &User) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();

        if self.primary_admin_email == Some(email.as_str()) {
            return Err(AppError::Forbidden(
                "The primary admin cannot be removed".to_string(),
            ));
        }
        if caller.email == email {
            return Err(AppError::BadRequest(
                "You cannot remove your own admin access".to_string(),
            ));
        }

        if !AdminRepository::new(self.db).delete_by_email(&email).await? {
            return Err(AppError::NotFound("Admin not found".to_string()));
        }

        tracing::info!("{} revoked admin access of {}", caller.email, email);
        Ok(())
    }

    /// Seeds the primary admin when the admin table is empty.
    ///
    /// # Returns
    /// - `Ok(true)` - The primary admin was inserted
    /// - `Ok(false)` - No primary admin configured or admins already exist
    pub async fn ensure_primary_admin(&self) -> Result<bool, AppError> {
        let Some(email) = self.primary_admin_email else {
            return Ok(false);
        };

        let repo = AdminRepository::new(self.db);
        if repo.any_exists().await? {
            return Ok(false);
        }

        repo.create(email, "system").await?;
        tracing::info!("Seeded primary admin {}", email);

        Ok(true)
    }
}
