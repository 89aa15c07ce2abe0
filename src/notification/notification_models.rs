use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewMessage,
    NewOffer,
    OfferAccepted,
    OfferRejected,
    JobPosted,
    OrderPaid,
    PaymentReceived,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::NewMessage => write!(f, "new_message"),
            NotificationKind::NewOffer => write!(f, "new_offer"),
            NotificationKind::OfferAccepted => write!(f, "offer_accepted"),
            NotificationKind::OfferRejected => write!(f, "offer_rejected"),
            NotificationKind::JobPosted => write!(f, "job_posted"),
            NotificationKind::OrderPaid => write!(f, "order_paid"),
            NotificationKind::PaymentReceived => write!(f, "payment_received"),
        }
    }
}

/// Domain events that fan out to a user's inbox. Each variant carries the
/// structured ids it refers to; display text never encodes them.
#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent {
    NewMessage { chat_id: Uuid },
    NewOffer { chat_id: Uuid, offer_id: Uuid },
    OfferAccepted { chat_id: Uuid, offer_id: Uuid },
    OfferRejected { chat_id: Uuid, offer_id: Uuid },
    JobPosted { job_id: Uuid },
    OrderPaid { job_id: Uuid, offer_id: Uuid },
    PaymentReceived { job_id: Uuid, offer_id: Uuid },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationRefs {
    pub job_id: Option<Uuid>,
    pub chat_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::NewMessage { .. } => NotificationKind::NewMessage,
            NotificationEvent::NewOffer { .. } => NotificationKind::NewOffer,
            NotificationEvent::OfferAccepted { .. } => NotificationKind::OfferAccepted,
            NotificationEvent::OfferRejected { .. } => NotificationKind::OfferRejected,
            NotificationEvent::JobPosted { .. } => NotificationKind::JobPosted,
            NotificationEvent::OrderPaid { .. } => NotificationKind::OrderPaid,
            NotificationEvent::PaymentReceived { .. } => NotificationKind::PaymentReceived,
        }
    }

    pub fn refs(&self) -> NotificationRefs {
        match *self {
            NotificationEvent::NewMessage { chat_id } => NotificationRefs {
                chat_id: Some(chat_id),
                ..Default::default()
            },
            NotificationEvent::NewOffer { chat_id, offer_id }
            | NotificationEvent::OfferAccepted { chat_id, offer_id }
            | NotificationEvent::OfferRejected { chat_id, offer_id } => NotificationRefs {
                chat_id: Some(chat_id),
                offer_id: Some(offer_id),
                ..Default::default()
            },
            NotificationEvent::JobPosted { job_id } => NotificationRefs {
                job_id: Some(job_id),
                ..Default::default()
            },
            NotificationEvent::OrderPaid { job_id, offer_id }
            | NotificationEvent::PaymentReceived { job_id, offer_id } => NotificationRefs {
                job_id: Some(job_id),
                offer_id: Some(offer_id),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub job_id: Option<Uuid>,
    pub chat_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Client-side navigation target for this notification. Total over all
    /// kinds; anything missing its reference falls back to the dashboard.
    pub fn target(&self) -> String {
        match (self.kind, self.chat_id, self.job_id, self.offer_id) {
            (NotificationKind::NewMessage, Some(chat_id), _, _) => format!("/chats/{}", chat_id),
            (NotificationKind::NewOffer, Some(chat_id), _, _) => format!("/chats/{}", chat_id),
            (NotificationKind::OfferRejected, Some(chat_id), _, _) => {
                format!("/chats/{}", chat_id)
            }
            (NotificationKind::OfferAccepted, _, _, Some(offer_id)) => {
                format!("/orders/{}", offer_id)
            }
            (NotificationKind::OrderPaid, _, _, Some(offer_id)) => format!("/orders/{}", offer_id),
            (NotificationKind::PaymentReceived, _, _, Some(offer_id)) => {
                format!("/orders/{}", offer_id)
            }
            (NotificationKind::JobPosted, _, Some(job_id), _) => format!("/jobs/{}", job_id),
            _ => "/dashboard".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(kind: NotificationKind, refs: NotificationRefs) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind,
            message: "test".to_string(),
            job_id: refs.job_id,
            chat_id: refs.chat_id,
            offer_id: refs.offer_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_routing_is_total_over_all_kinds() {
        let chat_id = Uuid::new_v4();
        let job_id = Uuid::new_v4();
        let offer_id = Uuid::new_v4();

        let events = [
            NotificationEvent::NewMessage { chat_id },
            NotificationEvent::NewOffer { chat_id, offer_id },
            NotificationEvent::OfferAccepted { chat_id, offer_id },
            NotificationEvent::OfferRejected { chat_id, offer_id },
            NotificationEvent::JobPosted { job_id },
            NotificationEvent::OrderPaid { job_id, offer_id },
            NotificationEvent::PaymentReceived { job_id, offer_id },
        ];

        for event in events {
            let n = notification(event.kind(), event.refs());
            let target = n.target();
            assert!(target.starts_with('/'), "{:?} -> {}", event.kind(), target);
            assert_ne!(target, "/dashboard", "{:?} should route somewhere specific", event.kind());
        }
    }

    #[test]
    fn test_missing_reference_falls_back_to_dashboard() {
        let n = notification(NotificationKind::NewMessage, NotificationRefs::default());
        assert_eq!(n.target(), "/dashboard");
    }

    #[test]
    fn test_message_and_offer_events_route_to_chat() {
        let chat_id = Uuid::new_v4();
        let event = NotificationEvent::NewMessage { chat_id };
        let n = notification(event.kind(), event.refs());
        assert_eq!(n.target(), format!("/chats/{}", chat_id));
    }

    #[test]
    fn test_acceptance_routes_to_order_view() {
        let event = NotificationEvent::OfferAccepted {
            chat_id: Uuid::new_v4(),
            offer_id: Uuid::new_v4(),
        };
        let refs = event.refs();
        let n = notification(event.kind(), refs);
        assert_eq!(n.target(), format!("/orders/{}", refs.offer_id.unwrap()));
    }
}
