use super::*;

/// Tests that the newest membership for an email is returned, ignoring case.
///
/// Expected: Ok(Some) with the most recently created row
#[tokio::test]
async fn returns_newest_membership_for_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::MemberFactory::new(db)
        .email("ana@example.com")
        .expiry_date(date(2024, 12, 1))
        .build()
        .await?;
    let renewed = factory::member::MemberFactory::new(db)
        .email("ana@example.com")
        .expiry_date(date(2025, 1, 1))
        .build()
        .await?;
    factory::create_member(db).await?;

    let found = MemberRepository::new(db)
        .find_latest_by_email("Ana@Example.com")
        .await?
        .unwrap();

    assert_eq!(found.id, renewed.id);

    Ok(())
}

/// Tests lookup of an email without memberships.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_without_membership() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let found = MemberRepository::new(db)
        .find_latest_by_email("nobody@example.com")
        .await?;

    assert!(found.is_none());

    Ok(())
}
