use super::*;
use crate::model::admin::AdminDto;

/// Tests granting admin access.
///
/// Expected: 201 with the caller recorded as granter, 409 on a second grant
#[tokio::test]
async fn grants_admin_once() {
    let app = TestApp::new().await;
    let cookie = app.register_admin("coach@gard018.com").await;
    let body = json!({ "email": "Helper@Example.com" });

    let created = app
        .send(json_request(Method::POST, "/api/admins", Some(&cookie), body.clone()))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let admin: AdminDto = read_json(created).await;
    assert_eq!(admin.email, "helper@example.com");
    assert_eq!(admin.granted_by, "coach@gard018.com");

    let again = app
        .send(json_request(Method::POST, "/api/admins", Some(&cookie), body))
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

/// Tests revoking protected admins.
///
/// Expected: 403 for the primary admin, 400 for the caller themselves
#[tokio::test]
async fn protects_primary_admin_and_caller() {
    let app = TestApp::new().await;
    factory::create_admin(&app.db, FOUNDER).await.unwrap();
    let cookie = app.register_admin("coach@gard018.com").await;

    let primary = app
        .send(request(
            Method::DELETE,
            &format!("/api/admins/{}", FOUNDER),
            Some(&cookie),
        ))
        .await;
    let own = app
        .send(request(
            Method::DELETE,
            "/api/admins/coach@gard018.com",
            Some(&cookie),
        ))
        .await;

    assert_eq!(primary.status(), StatusCode::FORBIDDEN);
    assert_eq!(own.status(), StatusCode::BAD_REQUEST);
}
