use super::*;
use chrono::{TimeZone, Utc};

/// Tests the active to expired transition.
///
/// Expected: Ok(true), status expired and updated_at set to the given instant
#[tokio::test]
async fn expires_active_member() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let member = factory::create_member(db).await?;
    let now = Utc.with_ymd_and_hms(2025, 1, 10, 23, 0, 0).unwrap();

    let repo = MemberRepository::new(db);
    let changed = repo.mark_expired(member.id, now).await?;

    assert!(changed);
    let stored = repo.find_by_id(member.id).await?.unwrap();
    assert_eq!(stored.status, MemberStatus::Expired);
    assert_eq!(stored.updated_at, now);

    Ok(())
}

/// Tests that an already expired member is not transitioned again.
///
/// Expected: Ok(false) and updated_at unchanged
#[tokio::test]
async fn leaves_expired_member_untouched() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let member = factory::member::MemberFactory::new(db)
        .status("expired")
        .build()
        .await?;
    let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

    let repo = MemberRepository::new(db);
    let changed = repo.mark_expired(member.id, now).await?;

    assert!(!changed);
    let stored = repo.find_by_id(member.id).await?.unwrap();
    assert_eq!(stored.updated_at, member.updated_at);

    Ok(())
}
