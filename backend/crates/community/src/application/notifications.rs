//! Notification Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::domain::entity::notification::{NewNotification, Notification};
use crate::domain::repository::NotificationRepository;
use crate::error::{CommunityError, CommunityResult};

/// A notification as sent by a client. Exactly one receiver form is allowed.
#[derive(Debug, Clone, Default)]
pub struct SendNotificationInput {
    pub kind: String,
    pub message: String,
    pub receiver_ids: Option<Vec<UserId>>,
    pub receiver_id: Option<UserId>,
}

impl SendNotificationInput {
    /// Deduplicated receivers, or the list of format problems.
    fn receivers(&self) -> Result<Vec<UserId>, Vec<String>> {
        let mut errors = Vec::new();
        if self.kind.trim().is_empty() {
            errors.push("type is required".to_string());
        }
        if self.message.trim().is_empty() {
            errors.push("message is required".to_string());
        }

        let receivers = match (&self.receiver_ids, self.receiver_id) {
            (Some(ids), None) if ids.is_empty() => {
                errors.push("receiverIds must not be empty".to_string());
                Vec::new()
            }
            (Some(ids), None) => ids.clone(),
            (None, Some(id)) => vec![id],
            _ => {
                errors.push("exactly one of receiverIds or receiverId is required".to_string());
                Vec::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        let mut unique: Vec<UserId> = Vec::with_capacity(receivers.len());
        for id in receivers {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Ok(unique)
    }
}

pub struct NotificationUseCase<R>
where
    R: NotificationRepository,
{
    repo: Arc<R>,
}

impl<R> NotificationUseCase<R>
where
    R: NotificationRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn send(
        &self,
        sender_id: UserId,
        input: SendNotificationInput,
    ) -> CommunityResult<Vec<Notification>> {
        let receivers = input
            .receivers()
            .map_err(CommunityError::InvalidNotification)?;

        if let Some(unknown) = self.repo.unknown_users(&receivers).await?.first() {
            return Err(CommunityError::ReceiverNotFound(unknown.value()));
        }

        let notification = NewNotification {
            kind: input.kind,
            message: input.message,
            sender_id,
            timestamp_sent: Utc::now(),
        };
        let created = self
            .repo
            .insert_notifications(&notification, &receivers)
            .await?;

        tracing::info!(sender_id = %sender_id, receivers = created.len(), "Notifications created");
        Ok(created)
    }

    pub async fn received(&self, user_id: UserId) -> CommunityResult<Vec<Notification>> {
        self.repo.notifications_for(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryCommunityStore;

    fn input(receiver_ids: Option<Vec<i32>>, receiver_id: Option<i32>) -> SendNotificationInput {
        SendNotificationInput {
            kind: "Cancellation".into(),
            message: "This event is cancelled".into(),
            receiver_ids: receiver_ids.map(|ids| ids.into_iter().map(UserId::new).collect()),
            receiver_id: receiver_id.map(UserId::new),
        }
    }

    fn setup() -> (MemoryCommunityStore, NotificationUseCase<MemoryCommunityStore>) {
        let store = MemoryCommunityStore::default();
        for (id, name) in [(1, "org"), (2, "paul"), (3, "paula")] {
            store.add_user(id, name);
        }
        (store.clone(), NotificationUseCase::new(Arc::new(store)))
    }

    #[tokio::test]
    async fn test_fan_out_and_receive() {
        let (_, use_case) = setup();

        let created = use_case
            .send(UserId::new(1), input(Some(vec![2, 3, 2]), None))
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|n| n.sender_id == UserId::new(1)));

        tokio_test::assert_ok!(use_case.send(UserId::new(1), input(None, Some(2))).await);

        let received = use_case.received(UserId::new(2)).await.unwrap();
        assert_eq!(received.len(), 2);
        assert!(received[0].timestamp_sent >= received[1].timestamp_sent);
        assert!(use_case.received(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_format_errors() {
        let (_, use_case) = setup();

        for bad in [
            input(None, None),
            input(Some(vec![2]), Some(2)),
            input(Some(vec![]), None),
        ] {
            let err = use_case.send(UserId::new(1), bad).await.unwrap_err();
            assert!(matches!(err, CommunityError::InvalidNotification(_)));
        }

        let mut blank = input(None, Some(2));
        blank.kind.clear();
        blank.message = " ".into();
        match use_case.send(UserId::new(1), blank).await.unwrap_err() {
            CommunityError::InvalidNotification(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_receiver() {
        let (_, use_case) = setup();
        let err = use_case
            .send(UserId::new(1), input(Some(vec![2, 42]), None))
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::ReceiverNotFound(42)));
    }
}
