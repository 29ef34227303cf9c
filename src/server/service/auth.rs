use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

use crate::{
    model::auth::{RegisterDto, RegisterWithMembershipDto},
    server::{
        data::{admin::AdminRepository, member::MemberRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        model::{
            member::{CreateMemberParam, Member, MemberStatus},
            user::{CreateUserParam, User},
        },
        service::member::membership_expiry,
        util::{
            password::{hash_password, verify_password, verify_unknown_account},
            validate::{normalize_email, required_text, sanitize_text, validate_password},
        },
    },
};

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Returns
    /// - `Ok(User)` - The new user
    /// - `Err(AppError::BadRequest)` - Invalid email, name or password
    /// - `Err(AppError::Conflict)` - Email already registered
    pub async fn register(&self, payload: RegisterDto) -> Result<User, AppError> {
        let param = self
            .user_param(
                &payload.email,
                &payload.password,
                &payload.first_name,
                &payload.last_name,
            )
            .await?;

        Ok(UserRepository::new(self.db).create(param).await?)
    }

    /// Creates an account together with an active monthly membership.
    ///
    /// Both rows are written in one transaction.
    pub async fn register_with_membership(
        &self,
        payload: RegisterWithMembershipDto,
    ) -> Result<(User, Member), AppError> {
        let param = self
            .user_param(
                &payload.email,
                &payload.password,
                &payload.first_name,
                &payload.last_name,
            )
            .await?;
        let member_param = CreateMemberParam {
            first_name: param.first_name.clone(),
            last_name: param.last_name.clone(),
            email: param.email.clone(),
            start_date: payload.start_date,
            expiry_date: expiry_for(payload.start_date)?,
            status: MemberStatus::Active,
            membership_type: payload
                .membership_type
                .map(|t| sanitize_text(&t))
                .filter(|t| !t.is_empty()),
        };

        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn).create(param).await?;
        let member = MemberRepository::new(&txn).create(member_param).await?;
        txn.commit().await?;

        Ok((user, member))
    }

    /// Verifies credentials.
    ///
    /// Unknown emails and wrong passwords produce the same error after the same
    /// amount of hashing work.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            verify_unknown_account(password);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }

    pub async fn is_admin(&self, user: &User) -> Result<bool, DbErr> {
        AdminRepository::new(self.db).is_admin(&user.email).await
    }

    async fn user_param(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<CreateUserParam, AppError> {
        let email = normalize_email(email)?;
        let first_name = required_text("First name", first_name)?;
        let last_name = required_text("Last name", last_name)?;
        validate_password(password)?;

        if UserRepository::new(self.db)
            .find_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        Ok(CreateUserParam {
            email,
            password_hash: hash_password(password)?,
            first_name,
            last_name,
        })
    }
}

fn expiry_for(start_date: NaiveDate) -> Result<NaiveDate, AppError> {
    membership_expiry(start_date)
        .ok_or_else(|| AppError::BadRequest("Invalid start date".to_string()))
}
