use std::sync::Arc;
use tokio::sync::broadcast;

use crate::{
    chat::chat_service::ChatService,
    job::job_repository::JobRepository,
    notification::{
        notification_models::Notification, notification_repository::NotificationRepository,
        notification_service::NotificationService,
    },
    offer::offer_service::OfferService,
    user::user_repository::UserRepository,
    websocket::ConnectionManager,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notification_tx: broadcast::Sender<Notification>,
    pub ws_connections: ConnectionManager,
    pub user_repository: UserRepository,
    pub job_repository: JobRepository,
    pub notification_repository: NotificationRepository,
    pub chat_service: ChatService,
    pub offer_service: OfferService,
    pub notification_service: NotificationService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub storage_root: String,
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            storage_root: std::env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./uploads".to_string()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
