use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::WsMessage;

pub type WsSender = mpsc::UnboundedSender<WsMessage>;

/// Registry of live WebSocket senders, one per connected user. Entries are
/// added on upgrade and removed on every exit path of the socket task.
#[derive(Clone)]
pub struct ConnectionManager {
    connections: Arc<DashMap<Uuid, WsSender>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
        }
    }

    pub fn add_connection(&self, user_id: Uuid, sender: WsSender) {
        self.connections.insert(user_id, sender);
        tracing::info!("User {} connected via WebSocket", user_id);
    }

    pub fn remove_connection(&self, user_id: &Uuid) {
        self.connections.remove(user_id);
        tracing::info!("User {} disconnected from WebSocket", user_id);
    }

    /// Send a message to a specific user; returns false if they are offline.
    pub fn send_to_user(&self, user_id: &Uuid, message: WsMessage) -> bool {
        if let Some(sender) = self.connections.get(user_id) {
            sender.send(message).is_ok()
        } else {
            false
        }
    }

    pub fn broadcast(&self, message: WsMessage) {
        for entry in self.connections.iter() {
            let _ = entry.value().send(message.clone());
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::types::{ErrorPayload, WsMessage};

    #[test]
    fn test_send_to_offline_user_is_a_noop() {
        let manager = ConnectionManager::new();
        let delivered = manager.send_to_user(
            &Uuid::new_v4(),
            WsMessage::Error(ErrorPayload {
                message: "test".to_string(),
            }),
        );
        assert!(!delivered);
    }

    #[test]
    fn test_connection_lifecycle() {
        let manager = ConnectionManager::new();
        let user_id = Uuid::new_v4();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        manager.add_connection(user_id, tx);
        assert!(manager.send_to_user(
            &user_id,
            WsMessage::Error(ErrorPayload {
                message: "hello".to_string(),
            }),
        ));
        assert!(rx.try_recv().is_ok());

        manager.remove_connection(&user_id);
        assert!(!manager.send_to_user(
            &user_id,
            WsMessage::Error(ErrorPayload {
                message: "gone".to_string(),
            }),
        ));
    }
}
