use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{notification::notification_models::NotificationKind, offer::offer_models::OfferStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    ChatMessage(ChatMessagePayload),
    Typing(TypingPayload),
    OfferCreated(OfferCreatedPayload),
    OfferResolved(OfferResolvedPayload),
    Notification(NotificationPayload),
    JobPosted(JobPostedPayload),
    Error(ErrorPayload),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessagePayload {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
    pub attachment_type: Option<String>,
    pub attachment_name: Option<String>,
    // Receivers re-derive display order from this, never from arrival order.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TypingPayload {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub is_typing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfferCreatedPayload {
    pub offer_id: Uuid,
    pub chat_id: Uuid,
    pub freelancer_id: Uuid,
    pub amount: f64,
    pub delivery_time: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfferResolvedPayload {
    pub offer_id: Uuid,
    pub chat_id: Uuid,
    pub status: OfferStatus,
    pub checkout_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationPayload {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobPostedPayload {
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub budget: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorPayload {
    pub message: String,
}

// Client-to-server frames
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Typing { chat_id: Uuid, is_typing: bool },
    MarkRead { chat_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frame_parses_from_snake_case_json() {
        let frame: ClientMessage = serde_json::from_str(
            r#"{"type":"typing","chat_id":"7b6a2a1e-59a3-4bcd-9a60-48a7f6a0a001","is_typing":true}"#,
        )
        .unwrap();
        match frame {
            ClientMessage::Typing { is_typing, .. } => assert!(is_typing),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_server_frame_carries_type_tag() {
        let msg = WsMessage::Typing(TypingPayload {
            chat_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            is_typing: false,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "typing");
    }
}
