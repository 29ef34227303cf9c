use sea_orm::EntityTrait;

use super::*;
use crate::model::auth::UserProfileDto;

/// Tests a partial profile update.
///
/// Expected: first name changed, last name untouched
#[tokio::test]
async fn updates_only_given_fields() {
    let app = TestApp::new().await;
    let cookie = app.register("marko@example.com").await;

    let response = app
        .send(json_request(
            Method::PATCH,
            "/api/profile",
            Some(&cookie),
            json!({ "firstName": "Miloš" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let profile: UserProfileDto = read_json(response).await;
    assert_eq!(profile.first_name, "Miloš");
    assert_eq!(profile.last_name, "Jovanović");
}

/// Tests account deletion.
///
/// Expected: 200, the session ends and the membership row is gone
#[tokio::test]
async fn deletes_account_and_memberships() {
    let app = TestApp::new().await;
    let cookie = app.register("marko@example.com").await;
    factory::member::MemberFactory::new(&app.db)
        .email("marko@example.com")
        .build()
        .await
        .unwrap();

    let response = app
        .send(request(Method::DELETE, "/api/profile", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let session = app
        .send(request(Method::GET, "/api/auth/session", Some(&cookie)))
        .await;
    assert_eq!(session.status(), StatusCode::UNAUTHORIZED);

    let members = entity::prelude::Member::find().all(&app.db).await.unwrap();
    assert!(members.is_empty());
}

/// Tests the primary admin deleting their own account.
///
/// Expected: 403 and the account is kept
#[tokio::test]
async fn primary_admin_cannot_delete_account() {
    let app = TestApp::new().await;
    let cookie = app.register_admin(FOUNDER).await;

    let response = app
        .send(request(Method::DELETE, "/api/profile", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let session = app
        .send(request(Method::GET, "/api/auth/session", Some(&cookie)))
        .await;
    assert_eq!(session.status(), StatusCode::OK);
}
