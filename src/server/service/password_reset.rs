use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use url::Url;

use crate::server::{
    data::{password_reset::PasswordResetRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    mail::{
        view::{EmailView, PasswordResetEmail, CLUB},
        Mailer,
    },
    util::{
        password::hash_password,
        token::{generate_token, hash_token},
        validate::validate_password,
    },
};

/// Minutes a reset link stays valid.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub struct PasswordResetService<'a> {
    db: &'a DatabaseConnection,
    mailer: &'a dyn Mailer,
    app_url: &'a Url,
}

impl<'a> PasswordResetService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: &'a dyn Mailer, app_url: &'a Url) -> Self {
        Self {
            db,
            mailer,
            app_url,
        }
    }

    /// Emails a reset link when `email` belongs to an account.
    ///
    /// Only the SHA-256 digest of the token is stored. Unknown emails are
    /// silently ignored so callers cannot tell which emails have accounts.
    pub async fn request(&self, email: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_token();
        PasswordResetRepository::new(self.db)
            .create(
                user.id,
                hash_token(&token),
                now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
            )
            .await?;

        let reset_url = self.reset_url(&token)?;
        let message = PasswordResetEmail {
            club: &CLUB,
            first_name: &user.first_name,
            reset_url: reset_url.as_str(),
            valid_minutes: RESET_TOKEN_TTL_MINUTES,
        }
        .to_message(&user.email)?;

        self.mailer.send(message).await?;
        tracing::info!("Sent password reset link to user {}", user.id);

        Ok(())
    }

    /// Sets a new password using a reset token.
    ///
    /// # Returns
    /// - `Ok(())` - Password changed; every outstanding token of the user is spent
    /// - `Err(AppError::BadRequest)` - Password too short
    /// - `Err(AuthError::InvalidResetToken)` - Token unknown, used or expired
    pub async fn reset(
        &self,
        token: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        validate_password(password)?;

        let txn = self.db.begin().await?;
        let tokens = PasswordResetRepository::new(&txn);

        let Some(reset) = tokens.find_by_hash(&hash_token(token.trim())).await? else {
            return Err(AuthError::InvalidResetToken.into());
        };
        if !reset.is_usable(now) {
            return Err(AuthError::InvalidResetToken.into());
        }

        let password_hash = hash_password(password)?;
        if !UserRepository::new(&txn)
            .update_password(reset.user_id, password_hash)
            .await?
        {
            return Err(AuthError::InvalidResetToken.into());
        }

        tokens.mark_used(reset.id, now).await?;
        tokens.expire_all_for_user(reset.user_id, now).await?;
        txn.commit().await?;

        tracing::info!("Password reset completed for user {}", reset.user_id);
        Ok(())
    }

    fn reset_url(&self, token: &str) -> Result<Url, AppError> {
        let mut url = self
            .app_url
            .join("reset-password")
            .map_err(|e| AppError::InternalError(format!("Invalid reset URL: {}", e)))?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }
}
