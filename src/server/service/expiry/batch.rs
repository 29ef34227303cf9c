//! Packing notifications into provider batches.

use sha2::{Digest, Sha256};

use super::calendar::iso_date;
use crate::server::{
    mail::EmailMessage,
    model::{member::Member, notification::NotificationKind},
};

/// Every message owed to one member on one run.
///
/// A warning is a single email. An expiry is the member's email plus the founder
/// notice. The messages of a notification are always sent in the same batch.
#[derive(Debug, Clone)]
pub struct Notification {
    pub member: Member,
    pub kind: NotificationKind,
    pub messages: Vec<EmailMessage>,
}

/// Groups notifications into batches of at most `max_messages` messages.
///
/// Notifications are kept whole and in order. One that alone exceeds the limit is
/// placed in a batch of its own.
pub fn pack(notifications: Vec<Notification>, max_messages: usize) -> Vec<Vec<Notification>> {
    let mut batches = Vec::new();
    let mut current: Vec<Notification> = Vec::new();
    let mut current_len = 0;

    for notification in notifications {
        let len = notification.messages.len();
        if !current.is_empty() && current_len + len > max_messages {
            batches.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current_len += len;
        current.push(notification);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

/// Flattens a batch into the messages sent to the provider.
pub fn messages(batch: &[Notification]) -> Vec<EmailMessage> {
    batch
        .iter()
        .flat_map(|notification| notification.messages.iter().cloned())
        .collect()
}

/// Idempotency key the provider uses to drop repeated deliveries of a batch.
///
/// Derived from the kind, member and expiry date of every notification, so each
/// attempt at the same batch carries the same key and a new run of an unchanged
/// batch does too.
pub fn idempotency_key(batch: &[Notification]) -> String {
    let mut hasher = Sha256::new();
    for notification in batch {
        hasher.update(
            format!(
                "{}:{}@{};",
                notification.kind.as_str(),
                notification.member.id,
                iso_date(notification.member.expiry_date)
            )
            .as_bytes(),
        );
    }
    format!("membership-expiry/{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::member::MemberStatus;
    use chrono::{NaiveDate, Utc};

    fn notification(id: i32, kind: NotificationKind) -> Notification {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let message = |to: String| EmailMessage {
            to,
            subject: "s".to_string(),
            html: "h".to_string(),
        };
        let email = format!("m{}@example.com", id);
        let messages = match kind {
            NotificationKind::Warning => vec![message(email.clone())],
            NotificationKind::Expiry => {
                vec![message(email.clone()), message("owner@gard018.com".into())]
            }
        };

        Notification {
            member: Member {
                id,
                first_name: "F".to_string(),
                last_name: "L".to_string(),
                email,
                start_date: date,
                expiry_date: date,
                status: MemberStatus::Active,
                membership_type: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            kind,
            messages,
        }
    }

    #[test]
    fn splits_150_warnings_into_100_and_50() {
        let notifications = (1..=150)
            .map(|id| notification(id, NotificationKind::Warning))
            .collect();

        let batches = pack(notifications, 100);

        assert_eq!(batches.len(), 2);
        assert_eq!(messages(&batches[0]).len(), 100);
        assert_eq!(messages(&batches[1]).len(), 50);
        assert_eq!(batches[1][0].member.id, 101);
    }

    #[test]
    fn keeps_member_and_founder_messages_together() {
        let notifications = (1..=60)
            .map(|id| notification(id, NotificationKind::Expiry))
            .collect();

        let batches = pack(notifications, 100);

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 50);
        assert_eq!(batches[1].len(), 10);
        assert_eq!(messages(&batches[0]).len(), 100);
        assert_eq!(messages(&batches[1]).len(), 20);
    }

    #[test]
    fn odd_limit_never_splits_a_notification() {
        let notifications = (1..=3)
            .map(|id| notification(id, NotificationKind::Expiry))
            .collect();

        let batches = pack(notifications, 3);

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|batch| messages(batch).len() == 2));
    }

    #[test]
    fn nothing_to_pack() {
        assert!(pack(Vec::new(), 100).is_empty());
    }

    #[test]
    fn idempotency_key_depends_on_batch_contents() {
        let batch = vec![
            notification(1, NotificationKind::Warning),
            notification(2, NotificationKind::Warning),
        ];
        let key = idempotency_key(&batch);

        assert_eq!(key, idempotency_key(&batch.clone()));
        assert!(key.starts_with("membership-expiry/"));
        assert!(key.len() <= 256);
        assert_ne!(key, idempotency_key(&batch[..1]));
        assert_ne!(
            key,
            idempotency_key(&[
                notification(1, NotificationKind::Expiry),
                notification(2, NotificationKind::Expiry),
            ])
        );
    }
}
