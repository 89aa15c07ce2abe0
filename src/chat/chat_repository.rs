use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    chat_dto::ChatRow,
    chat_models::{Chat, Message},
};

const CHAT_ROW_SELECT: &str =
    "SELECT c.id, c.job_id, c.client_id, c.freelancer_id, c.created_at, c.last_activity_at,
            j.title AS job_title, j.budget AS job_budget,
            cu.username AS client_username, cu.avatar_url AS client_avatar_url,
            fu.username AS freelancer_username, fu.avatar_url AS freelancer_avatar_url
     FROM chats c
     JOIN jobs j ON j.id = c.job_id
     JOIN users cu ON cu.id = c.client_id
     JOIN users fu ON fu.id = c.freelancer_id";

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lazy conversation creation: the unique (job, client, freelancer)
    /// triple is reused on conflict, so repeat contact lands in the same
    /// chat.
    pub async fn find_or_create(
        &self,
        job_id: Uuid,
        client_id: Uuid,
        freelancer_id: Uuid,
    ) -> Result<Chat> {
        let chat = sqlx::query_as::<_, Chat>(
            "INSERT INTO chats (job_id, client_id, freelancer_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (job_id, client_id, freelancer_id)
             DO UPDATE SET job_id = EXCLUDED.job_id
             RETURNING *",
        )
        .bind(job_id)
        .bind(client_id)
        .bind(freelancer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(chat)
    }

    pub async fn find_by_id(&self, chat_id: Uuid) -> Result<Option<Chat>> {
        let chat = sqlx::query_as::<_, Chat>("SELECT * FROM chats WHERE id = $1")
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(chat)
    }

    /// Conversations where the user is either party, most recently active
    /// first, enriched with job and profile metadata.
    pub async fn find_rows_for_user(&self, user_id: Uuid) -> Result<Vec<ChatRow>> {
        let rows = sqlx::query_as::<_, ChatRow>(&format!(
            "{CHAT_ROW_SELECT}
             WHERE c.client_id = $1 OR c.freelancer_id = $1
             ORDER BY c.last_activity_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_row_by_id(&self, chat_id: Uuid) -> Result<Option<ChatRow>> {
        let row = sqlx::query_as::<_, ChatRow>(&format!("{CHAT_ROW_SELECT} WHERE c.id = $1"))
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_messages(&self, chat_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages
             WHERE chat_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Insert a message and bump the chat's last-activity time in one
    /// transaction.
    pub async fn insert_message(
        &self,
        chat_id: Uuid,
        sender_id: Uuid,
        content: &str,
        attachment_url: Option<&str>,
        attachment_type: Option<&str>,
        attachment_name: Option<&str>,
    ) -> Result<Message> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (chat_id, sender_id, content, attachment_url, attachment_type, attachment_name)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(chat_id)
        .bind(sender_id)
        .bind(content)
        .bind(attachment_url)
        .bind(attachment_type)
        .bind(attachment_name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE chats SET last_activity_at = now() WHERE id = $1")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message)
    }

    /// Mark every message addressed to `reader_id` in the chat as read.
    /// Idempotent: already-read rows match nothing.
    pub async fn mark_conversation_read(&self, chat_id: Uuid, reader_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE messages
             SET is_read = true
             WHERE chat_id = $1 AND sender_id <> $2 AND is_read = false",
        )
        .bind(chat_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Freelancers this client has an existing conversation with.
    pub async fn find_freelancer_contacts(&self, client_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT freelancer_id FROM chats WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    pub async fn touch_last_activity(&self, chat_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE chats SET last_activity_at = now() WHERE id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
