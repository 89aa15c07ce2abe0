use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One conversation between a client and a freelancer about one job. The
/// (job, client, freelancer) triple is unique; first contact reuses the
/// existing row instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Chat {
    pub id: Uuid,
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Chat {
    pub fn is_party(&self, user_id: Uuid) -> bool {
        user_id == self.client_id || user_id == self.freelancer_id
    }

    /// The other side of the conversation. Callers check `is_party` first.
    pub fn counterparty(&self, user_id: Uuid) -> Uuid {
        if user_id == self.client_id {
            self.freelancer_id
        } else {
            self.client_id
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
    pub attachment_type: Option<String>,
    pub attachment_name: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Display order is creation time ascending, never arrival order. Ties break
/// on id so the order is stable across refetches.
pub fn sort_messages(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

/// Messages addressed to `viewer_id` that have not been read yet.
pub fn unread_count(messages: &[Message], viewer_id: Uuid) -> i64 {
    messages
        .iter()
        .filter(|m| m.sender_id != viewer_id && !m.is_read)
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn message(sender_id: Uuid, offset_secs: i64, is_read: bool) -> Message {
        Message {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            sender_id,
            content: "hello".to_string(),
            attachment_url: None,
            attachment_type: None,
            attachment_name: None,
            is_read,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_sort_recovers_creation_order_from_shuffled_arrival() {
        let sender = Uuid::new_v4();
        let first = message(sender, 0, false);
        let second = message(sender, 5, false);
        let third = message(sender, 10, false);

        // Push events arrived out of order.
        let mut arrived = vec![third.clone(), first.clone(), second.clone()];
        sort_messages(&mut arrived);

        let ids: Vec<Uuid> = arrived.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let sender = Uuid::new_v4();
        let mut a = message(sender, 0, false);
        let mut b = message(sender, 0, false);
        a.created_at = b.created_at;
        if a.id > b.id {
            std::mem::swap(&mut a, &mut b);
        }

        let mut once = vec![b.clone(), a.clone()];
        let mut twice = vec![a.clone(), b.clone()];
        sort_messages(&mut once);
        sort_messages(&mut twice);

        assert_eq!(once[0].id, twice[0].id);
        assert_eq!(once[1].id, twice[1].id);
    }

    #[test]
    fn test_unread_count_excludes_own_and_read_messages() {
        let viewer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let messages = vec![
            message(other, 0, false),
            message(other, 1, false),
            message(other, 2, true),
            message(viewer, 3, false),
        ];
        assert_eq!(unread_count(&messages, viewer), 2);
        // The viewer's own unread message is addressed to the other party.
        assert_eq!(unread_count(&messages, other), 1);
    }
}
