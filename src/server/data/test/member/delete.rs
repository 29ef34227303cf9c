use super::*;

/// Tests deleting a member by id.
///
/// Expected: Ok(true) then the member is gone; a second delete returns Ok(false)
#[tokio::test]
async fn deletes_member_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let member = factory::create_member(db).await?;
    let repo = MemberRepository::new(db);

    assert!(repo.delete(member.id).await?);
    assert!(repo.find_by_id(member.id).await?.is_none());
    assert!(!repo.delete(member.id).await?);

    Ok(())
}

/// Tests deleting every membership of an email.
///
/// Expected: Ok(2) and the other member survives
#[tokio::test]
async fn deletes_all_memberships_of_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_member_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::MemberFactory::new(db)
        .email("ana@example.com")
        .build()
        .await?;
    factory::member::MemberFactory::new(db)
        .email("ana@example.com")
        .build()
        .await?;
    let other = factory::create_member(db).await?;

    let repo = MemberRepository::new(db);
    let removed = repo.delete_by_email("ana@example.com").await?;

    assert_eq!(removed, 2);
    assert!(repo.find_by_id(other.id).await?.is_some());

    Ok(())
}
