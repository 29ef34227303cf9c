use super::*;

/// Tests that only active members on the requested dates are returned.
///
/// Expected: Ok with members on either date, excluding expired ones and other dates
#[tokio::test]
async fn returns_active_members_on_requested_dates() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let today = factory::create_member_expiring_on(db, date(2025, 1, 10)).await?;
    let warning = factory::create_member_expiring_on(db, date(2025, 1, 13)).await?;
    factory::create_member_expiring_on(db, date(2025, 1, 11)).await?;
    factory::member::MemberFactory::new(db)
        .expiry_date(date(2025, 1, 10))
        .status("expired")
        .build()
        .await?;

    let members = MemberRepository::new(db)
        .find_active_expiring_on(&[date(2025, 1, 10), date(2025, 1, 13)])
        .await?;
    let ids: Vec<_> = members.iter().map(|m| m.id).collect();

    assert_eq!(ids, vec![today.id, warning.id]);

    Ok(())
}

/// Tests that an empty date list short-circuits.
///
/// Expected: Ok with no members
#[tokio::test]
async fn returns_nothing_for_no_dates() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_member(db).await?;

    let members = MemberRepository::new(db).find_active_expiring_on(&[]).await?;

    assert!(members.is_empty());

    Ok(())
}
