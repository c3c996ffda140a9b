//! Notification Entities

use chrono::{DateTime, Utc};
use kernel::id::{NotificationId, UserId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp_sent: DateTime<Utc>,
    pub sender_id: UserId,
    pub receiver_id: UserId,
}

/// Notification to fan out, one row per receiver
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: String,
    pub message: String,
    pub sender_id: UserId,
    pub timestamp_sent: DateTime<Utc>,
}

impl NewNotification {
    pub fn for_receiver(&self, id: NotificationId, receiver_id: UserId) -> Notification {
        Notification {
            id,
            kind: self.kind.clone(),
            message: self.message.clone(),
            timestamp_sent: self.timestamp_sent,
            sender_id: self.sender_id,
            receiver_id,
        }
    }
}
