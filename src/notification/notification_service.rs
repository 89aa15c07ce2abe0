use tokio::sync::broadcast;
use uuid::Uuid;

use crate::websocket::{
    types::{NotificationPayload, WsMessage},
    ConnectionManager,
};
use super::{
    notification_models::{Notification, NotificationEvent},
    notification_repository::NotificationRepository,
};

/// Inbox fan-out. Writes are best-effort: a failed notification must never
/// roll back the domain event that triggered it.
#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    tx: broadcast::Sender<Notification>,
    ws: ConnectionManager,
}

impl NotificationService {
    pub fn new(
        repo: NotificationRepository,
        tx: broadcast::Sender<Notification>,
        ws: ConnectionManager,
    ) -> Self {
        Self { repo, tx, ws }
    }

    pub async fn notify(&self, user_id: Uuid, event: NotificationEvent, message: String) {
        let notification = match self
            .repo
            .create(user_id, event.kind(), &message, event.refs())
            .await
        {
            Ok(notification) => notification,
            Err(e) => {
                tracing::error!("Failed to write notification for {}: {:?}", user_id, e);
                return;
            }
        };

        self.ws.send_to_user(
            &user_id,
            WsMessage::Notification(NotificationPayload {
                id: notification.id,
                kind: notification.kind,
                message: notification.message.clone(),
                target: notification.target(),
                created_at: notification.created_at,
            }),
        );

        // SSE subscribers filter by user id on their side of the channel.
        let _ = self.tx.send(notification);
    }
}
