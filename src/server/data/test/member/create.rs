use super::*;

/// Tests inserting a member and reading it back.
///
/// Expected: Ok with dates and status stored as given
#[tokio::test]
async fn creates_member_with_calendar_dates() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberRepository::new(db);
    let member = repo
        .create(CreateMemberParam {
            first_name: "Ana".to_string(),
            last_name: "Petrović".to_string(),
            email: "ana@example.com".to_string(),
            start_date: date(2025, 1, 31),
            expiry_date: date(2025, 2, 28),
            status: MemberStatus::Active,
            membership_type: Some("monthly".to_string()),
        })
        .await?;

    let stored = repo.find_by_id(member.id).await?.unwrap();
    assert_eq!(stored.start_date, date(2025, 1, 31));
    assert_eq!(stored.expiry_date, date(2025, 2, 28));
    assert_eq!(stored.status, MemberStatus::Active);
    assert_eq!(stored.full_name(), "Ana Petrović");

    Ok(())
}

/// Tests that members are listed by ascending expiry date.
///
/// Expected: Ok with soonest expiry first
#[tokio::test]
async fn lists_members_by_expiry_date() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_member_expiring_on(db, date(2025, 3, 1)).await?;
    factory::create_member_expiring_on(db, date(2025, 1, 15)).await?;
    factory::create_member_expiring_on(db, date(2025, 2, 1)).await?;

    let members = MemberRepository::new(db).get_all().await?;
    let dates: Vec<_> = members.iter().map(|m| m.expiry_date).collect();

    assert_eq!(
        dates,
        vec![date(2025, 1, 15), date(2025, 2, 1), date(2025, 3, 1)]
    );

    Ok(())
}
