use crate::server::{
    data::message::MessageRepository,
    error::AppError,
    model::message::{CreateMessageParam, MessageStatus},
};
use test_utils::{builder::TestBuilder, factory};

/// Tests that new messages are stored unread and listed newest first.
///
/// Expected: Ok with the latest message first
#[tokio::test]
async fn stores_unread_messages_newest_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(entity::prelude::Message).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MessageRepository::new(db);
    let first = factory::create_message(db).await?;
    let second = repo
        .create(CreateMessageParam {
            name: "Jelena".to_string(),
            email: "jelena@example.com".to_string(),
            phone: Some("+381 60 000 000".to_string()),
            message: "Da li imate grupu za decu?".to_string(),
        })
        .await?;

    assert_eq!(second.status, MessageStatus::Unread);

    let ids: Vec<_> = repo.get_all().await?.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}

/// Tests marking a message as read, and updating a missing one.
///
/// Expected: Ok(Some) with read status; Ok(None) for an unknown id
#[tokio::test]
async fn updates_status() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(entity::prelude::Message).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let message = factory::create_message(db).await?;
    let repo = MessageRepository::new(db);

    let updated = repo
        .update_status(message.id, MessageStatus::Read)
        .await?
        .unwrap();
    assert_eq!(updated.status, MessageStatus::Read);

    assert!(repo.update_status(999, MessageStatus::Read).await?.is_none());

    Ok(())
}
