use sea_orm::EntityTrait;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::auth::UpdateProfileDto,
    server::{error::AppError, model::user::User, service::profile::ProfileService},
};

/// Tests a partial profile update.
///
/// Expected: given fields change, omitted fields stay
#[tokio::test]
async fn updates_only_given_fields() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = User::from_entity(
        factory::user::UserFactory::new(db)
            .name("Ana", "Petrović")
            .build()
            .await?,
    );

    let updated = ProfileService::new(db, None)
        .update(
            &user,
            UpdateProfileDto {
                first_name: Some("Anica".to_string()),
                avatar_url: Some("https://cdn.example.com/a.png".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.first_name, "Anica");
    assert_eq!(updated.last_name, "Petrović");
    assert_eq!(
        updated.avatar_url.as_deref(),
        Some("https://cdn.example.com/a.png")
    );

    let blank = ProfileService::new(db, None)
        .update(
            &user,
            UpdateProfileDto {
                last_name: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests deleting an account.
///
/// Expected: user, their memberships and admin row removed; others untouched
#[tokio::test]
async fn deletes_account_with_memberships_and_admin_access() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("ana@example.com")
            .build()
            .await?,
    );
    factory::member::MemberFactory::new(db)
        .email("ana@example.com")
        .build()
        .await?;
    factory::create_member(db).await?;
    factory::create_admin(db, "ana@example.com").await?;

    ProfileService::new(db, Some("owner@gard018.com"))
        .delete(&user)
        .await?;

    assert!(entity::prelude::User::find().all(db).await?.is_empty());
    assert!(entity::prelude::Admin::find().all(db).await?.is_empty());
    assert_eq!(entity::prelude::Member::find().all(db).await?.len(), 1);

    Ok(())
}

/// Tests the primary admin deleting their own account.
///
/// Expected: Err(Forbidden) and the user kept
#[tokio::test]
async fn primary_admin_cannot_delete_account() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = User::from_entity(
        factory::user::UserFactory::new(db)
            .email("owner@gard018.com")
            .build()
            .await?,
    );

    let result = ProfileService::new(db, Some("owner@gard018.com"))
        .delete(&user)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(entity::prelude::User::find().all(db).await?.len(), 1);

    Ok(())
}
