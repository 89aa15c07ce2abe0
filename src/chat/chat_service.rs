use std::sync::Arc;

use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    job::job_repository::JobRepository,
    notification::{notification_models::NotificationEvent, notification_service::NotificationService},
    offer::offer_repository::OfferRepository,
    storage::{sanitize_file_name, ObjectStore},
    user::user_repository::UserRepository,
    websocket::{
        types::{ChatMessagePayload, WsMessage},
        ConnectionManager,
    },
};
use super::{
    chat_dto::{ConversationView, OpenChatRequest, SendMessageRequest},
    chat_models::{sort_messages, unread_count, Chat, Message},
    chat_repository::ChatRepository,
};

pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Attachments are bounded before any upload is attempted; an oversized file
/// never reaches the object store.
pub fn check_attachment_size(len: usize) -> Result<()> {
    if len > MAX_ATTACHMENT_BYTES {
        return Err(AppError::Validation(
            "Attachment exceeds the 10 MB limit".to_string(),
        ));
    }
    Ok(())
}

pub fn attachment_kind(content_type: &str) -> &'static str {
    if content_type.starts_with("image/") {
        "image"
    } else {
        "file"
    }
}

/// Short inbox preview for a new-message notification.
pub fn message_preview(content: &str, attachment_name: Option<&str>) -> String {
    if content.is_empty() {
        if let Some(name) = attachment_name {
            return format!("Sent an attachment: {}", name);
        }
    }
    let mut preview: String = content.chars().take(80).collect();
    if content.chars().count() > 80 {
        preview.push('…');
    }
    preview
}

#[derive(Clone)]
pub struct ChatService {
    repo: ChatRepository,
    offer_repo: OfferRepository,
    job_repo: JobRepository,
    user_repo: UserRepository,
    store: Arc<dyn ObjectStore>,
    notifier: NotificationService,
    ws: ConnectionManager,
}

impl ChatService {
    pub fn new(
        repo: ChatRepository,
        offer_repo: OfferRepository,
        job_repo: JobRepository,
        user_repo: UserRepository,
        store: Arc<dyn ObjectStore>,
        notifier: NotificationService,
        ws: ConnectionManager,
    ) -> Self {
        Self {
            repo,
            offer_repo,
            job_repo,
            user_repo,
            store,
            notifier,
            ws,
        }
    }

    /// Every conversation the user is a party of, most recently active
    /// first, with messages, offers and the viewer's unread count.
    pub async fn list_conversations(&self, actor_id: Uuid) -> Result<Vec<ConversationView>> {
        let rows = self.repo.find_rows_for_user(actor_id).await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.assemble(row, actor_id).await?);
        }

        Ok(views)
    }

    pub async fn get_conversation(&self, actor_id: Uuid, chat_id: Uuid) -> Result<ConversationView> {
        let row = self
            .repo
            .find_row_by_id(chat_id)
            .await?
            .ok_or(AppError::NotFound("Chat not found".to_string()))?;

        if actor_id != row.client_id && actor_id != row.freelancer_id {
            return Err(AppError::Forbidden(
                "Not a party of this conversation".to_string(),
            ));
        }

        self.assemble(row, actor_id).await
    }

    /// First contact between a client and a freelancer about a job; repeat
    /// contact lands in the existing chat.
    pub async fn open_conversation(
        &self,
        actor_id: Uuid,
        req: OpenChatRequest,
    ) -> Result<ConversationView> {
        if actor_id == req.counterparty_id {
            return Err(AppError::Validation(
                "Cannot open a conversation with yourself".to_string(),
            ));
        }

        let job = self
            .job_repo
            .find_by_id(req.job_id)
            .await?
            .ok_or(AppError::NotFound("Job not found".to_string()))?;

        let (client_id, freelancer_id) = if actor_id == job.client_id {
            (actor_id, req.counterparty_id)
        } else if req.counterparty_id == job.client_id {
            (req.counterparty_id, actor_id)
        } else {
            return Err(AppError::Forbidden(
                "Conversation must involve the job's client".to_string(),
            ));
        };

        let freelancer = self
            .user_repo
            .find_by_id(freelancer_id)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;
        if !freelancer.is_freelancer() {
            return Err(AppError::Validation(
                "Counterparty must be a freelancer".to_string(),
            ));
        }

        let chat = self.repo.find_or_create(job.id, client_id, freelancer_id).await?;

        self.get_conversation(actor_id, chat.id).await
    }

    pub async fn send_message(
        &self,
        actor_id: Uuid,
        chat_id: Uuid,
        req: SendMessageRequest,
    ) -> Result<Message> {
        let chat = self.require_party(actor_id, chat_id).await?;

        let content = req.content.trim().to_string();
        if content.is_empty() && req.attachment.is_none() {
            return Err(AppError::Validation(
                "Message must have text or an attachment".to_string(),
            ));
        }

        // Upload first; the message row is only written once the attachment
        // is durably stored and has a URL.
        let mut attachment_url = None;
        let mut attachment_type = None;
        let mut attachment_name = None;
        if let Some(attachment) = &req.attachment {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&attachment.data)
                .map_err(|_| AppError::BadRequest("Invalid attachment encoding".to_string()))?;
            check_attachment_size(bytes.len())?;

            let name = sanitize_file_name(&attachment.file_name);
            let path = format!(
                "{}/{}/{}_{}",
                chat_id,
                actor_id,
                Utc::now().timestamp_millis(),
                name
            );
            let url = self.store.put(&path, &bytes).await?;

            attachment_url = Some(url);
            attachment_type = Some(attachment_kind(&attachment.content_type).to_string());
            attachment_name = Some(name);
        }

        let message = self
            .repo
            .insert_message(
                chat_id,
                actor_id,
                &content,
                attachment_url.as_deref(),
                attachment_type.as_deref(),
                attachment_name.as_deref(),
            )
            .await?;

        let payload = WsMessage::ChatMessage(ChatMessagePayload {
            id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            attachment_url: message.attachment_url.clone(),
            attachment_type: message.attachment_type.clone(),
            attachment_name: message.attachment_name.clone(),
            created_at: message.created_at,
        });

        let counterparty = chat.counterparty(actor_id);
        self.ws.send_to_user(&counterparty, payload.clone());
        // Echo back so other sessions of the sender stay in sync.
        self.ws.send_to_user(&actor_id, payload);

        self.notifier
            .notify(
                counterparty,
                NotificationEvent::NewMessage { chat_id },
                message_preview(&message.content, message.attachment_name.as_deref()),
            )
            .await;

        Ok(message)
    }

    /// Idempotent: a second call finds nothing left to flip.
    pub async fn mark_read(&self, actor_id: Uuid, chat_id: Uuid) -> Result<()> {
        self.require_party(actor_id, chat_id).await?;
        self.repo.mark_conversation_read(chat_id, actor_id).await?;
        Ok(())
    }

    /// Freelancers a client has previously talked to, for durable fan-out
    /// of that client's new job postings.
    pub async fn freelancer_contacts(&self, client_id: Uuid) -> Result<Vec<Uuid>> {
        self.repo.find_freelancer_contacts(client_id).await
    }

    pub async fn require_party(&self, actor_id: Uuid, chat_id: Uuid) -> Result<Chat> {
        let chat = self
            .repo
            .find_by_id(chat_id)
            .await?
            .ok_or(AppError::NotFound("Chat not found".to_string()))?;

        if !chat.is_party(actor_id) {
            return Err(AppError::Forbidden(
                "Not a party of this conversation".to_string(),
            ));
        }

        Ok(chat)
    }

    async fn assemble(
        &self,
        row: super::chat_dto::ChatRow,
        actor_id: Uuid,
    ) -> Result<ConversationView> {
        let mut messages = self.repo.find_messages(row.id).await?;
        // The query orders by created_at, but order is re-derived here so a
        // view never depends on how rows happened to arrive.
        sort_messages(&mut messages);

        let offers = self.offer_repo.find_for_chat(row.id).await?;
        let unread = unread_count(&messages, actor_id);
        let counterparty = row.counterparty_view(actor_id);

        Ok(ConversationView {
            id: row.id,
            job_id: row.job_id,
            job_title: row.job_title,
            job_budget: row.job_budget,
            client_id: row.client_id,
            freelancer_id: row.freelancer_id,
            counterparty,
            messages,
            offers,
            unread_count: unread,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_at_limit_is_accepted() {
        assert!(check_attachment_size(MAX_ATTACHMENT_BYTES).is_ok());
        assert!(check_attachment_size(2 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_oversized_attachment_rejected_before_upload() {
        let err = check_attachment_size(11 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_attachment_kind_from_content_type() {
        assert_eq!(attachment_kind("image/png"), "image");
        assert_eq!(attachment_kind("image/jpeg"), "image");
        assert_eq!(attachment_kind("application/pdf"), "file");
    }

    #[test]
    fn test_message_preview_truncates_long_text() {
        let long = "x".repeat(200);
        let preview = message_preview(&long, None);
        assert_eq!(preview.chars().count(), 81);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn test_message_preview_names_attachment_when_no_text() {
        assert_eq!(
            message_preview("", Some("logo.png")),
            "Sent an attachment: logo.png"
        );
        assert_eq!(message_preview("See attached", Some("logo.png")), "See attached");
    }
}
