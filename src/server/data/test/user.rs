use crate::server::{
    data::user::UserRepository,
    model::user::{CreateUserParam, UpdateProfileParam},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

fn param(email: &str) -> CreateUserParam {
    CreateUserParam {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        first_name: "Marko".to_string(),
        last_name: "Jovanović".to_string(),
    }
}

/// Tests creating a user and finding it by email regardless of case.
///
/// Expected: Ok(Some) for a differently cased lookup
#[tokio::test]
async fn finds_created_user_by_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo.create(param("marko@example.com")).await?;

    let found = repo.find_by_email("MARKO@example.com").await?.unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.full_name(), "Marko Jovanović");

    Ok(())
}

/// Tests that a duplicate email violates the unique constraint.
///
/// Expected: Err on the second insert
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    repo.create(param("marko@example.com")).await?;

    assert!(repo.create(param("marko@example.com")).await.is_err());

    Ok(())
}

/// Tests that a partial profile update only changes provided fields.
///
/// Expected: Ok(Some) with new first name and avatar, last name unchanged
#[tokio::test]
async fn applies_partial_profile_update() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .name("Marko", "Jovanović")
        .build()
        .await?;

    let updated = UserRepository::new(db)
        .update_profile(
            user.id,
            UpdateProfileParam {
                first_name: Some("Mare".to_string()),
                last_name: None,
                avatar_url: Some("https://example.com/m.png".to_string()),
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.first_name, "Mare");
    assert_eq!(updated.last_name, "Jovanović");
    assert_eq!(updated.avatar_url.as_deref(), Some("https://example.com/m.png"));

    Ok(())
}

/// Tests replacing the password hash of a missing user.
///
/// Expected: Ok(false)
#[tokio::test]
async fn password_update_reports_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let updated = UserRepository::new(db)
        .update_password(404, "hash".to_string())
        .await?;

    assert!(!updated);

    Ok(())
}
