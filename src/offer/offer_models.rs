use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Offer lifecycle: `pending -> accepted` or `pending -> rejected`. Both
/// outcomes are terminal; an offer never returns to pending, and its amount
/// and description are never edited (a fresh offer replaces it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }

    pub fn resolve(accept: bool) -> OfferStatus {
        if accept {
            OfferStatus::Accepted
        } else {
            OfferStatus::Rejected
        }
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferStatus::Pending => write!(f, "pending"),
            OfferStatus::Accepted => write!(f, "accepted"),
            OfferStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A structured price/timeline/description proposal from the freelancer to
/// the client within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Offer {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub freelancer_id: Uuid,
    pub client_id: Uuid,
    pub amount: f64,
    pub delivery_time: String,
    pub description: String,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_the_only_open_state() {
        assert!(!OfferStatus::Pending.is_terminal());
        assert!(OfferStatus::Accepted.is_terminal());
        assert!(OfferStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_resolve_maps_decision_to_status() {
        assert_eq!(OfferStatus::resolve(true), OfferStatus::Accepted);
        assert_eq!(OfferStatus::resolve(false), OfferStatus::Rejected);
    }

    #[test]
    fn test_status_display_matches_storage() {
        assert_eq!(OfferStatus::Pending.to_string(), "pending");
        assert_eq!(OfferStatus::Accepted.to_string(), "accepted");
        assert_eq!(OfferStatus::Rejected.to_string(), "rejected");
    }
}
