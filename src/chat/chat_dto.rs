use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::offer::offer_models::Offer;
use super::chat_models::Message;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenChatRequest {
    pub job_id: Uuid,
    /// The other party: the job's client when a freelancer reaches out, or
    /// the freelancer a client wants to contact.
    pub counterparty_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded file bytes.
    pub data: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// May be empty when an attachment is present.
    #[serde(default)]
    pub content: String,
    pub attachment: Option<AttachmentUpload>,
}

/// Chat row joined with job and both party profiles, straight from the
/// directory query.
#[derive(Debug, Clone, FromRow)]
pub struct ChatRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub job_title: String,
    pub job_budget: f64,
    pub client_username: String,
    pub client_avatar_url: Option<String>,
    pub freelancer_username: String,
    pub freelancer_avatar_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartyView {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub job_budget: f64,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    pub counterparty: PartyView,
    pub messages: Vec<Message>,
    pub offers: Vec<Offer>,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl ChatRow {
    /// The other party's profile, as seen by `viewer_id`.
    pub fn counterparty_view(&self, viewer_id: Uuid) -> PartyView {
        if viewer_id == self.client_id {
            PartyView {
                id: self.freelancer_id,
                username: self.freelancer_username.clone(),
                avatar_url: self.freelancer_avatar_url.clone(),
            }
        } else {
            PartyView {
                id: self.client_id,
                username: self.client_username.clone(),
                avatar_url: self.client_avatar_url.clone(),
            }
        }
    }
}
