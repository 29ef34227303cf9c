use super::*;

/// Tests changing the expiry date together with the status.
///
/// Expected: Ok(Some) with new date and status
#[tokio::test]
async fn updates_date_and_status() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let member = factory::member::MemberFactory::new(db)
        .status("expired")
        .build()
        .await?;

    let updated = MemberRepository::new(db)
        .update_expiry(member.id, date(2025, 6, 1), MemberStatus::Active)
        .await?
        .unwrap();

    assert_eq!(updated.expiry_date, date(2025, 6, 1));
    assert_eq!(updated.status, MemberStatus::Active);
    assert!(updated.updated_at >= member.updated_at);

    Ok(())
}

/// Tests updating a member that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_member() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = MemberRepository::new(db)
        .update_expiry(999, date(2025, 6, 1), MemberStatus::Active)
        .await?;

    assert!(result.is_none());

    Ok(())
}
