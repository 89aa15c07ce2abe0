mod auth;
mod chat;
mod db;
mod error;
mod job;
mod middleware;
mod notification;
mod offer;
mod routes;
mod state;
mod storage;
mod user;
mod websocket;

use std::sync::Arc;

use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config};
use storage::LocalObjectStore;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use websocket::ConnectionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gigmarket=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Realtime plumbing: per-user WebSocket registry plus a broadcast
    // channel feeding the SSE notification stream
    let ws_connections = ConnectionManager::new();
    let (notification_tx, _) = broadcast::channel(100);

    // Attachment storage
    let store = Arc::new(LocalObjectStore::new(
        config.storage_root.clone(),
        config.public_base_url.clone(),
    ));

    // Repositories
    let user_repository = user::UserRepository::new(db.clone());
    let job_repository = job::JobRepository::new(db.clone());
    let chat_repository = chat::ChatRepository::new(db.clone());
    let offer_repository = offer::OfferRepository::new(db.clone());
    let notification_repository = notification::NotificationRepository::new(db.clone());

    // Services
    let notification_service = notification::NotificationService::new(
        notification_repository.clone(),
        notification_tx.clone(),
        ws_connections.clone(),
    );
    let chat_service = chat::ChatService::new(
        chat_repository.clone(),
        offer_repository.clone(),
        job_repository.clone(),
        user_repository.clone(),
        store,
        notification_service.clone(),
        ws_connections.clone(),
    );
    let offer_service = offer::OfferService::new(
        offer_repository,
        chat_repository,
        notification_service.clone(),
        ws_connections.clone(),
    );

    let state = AppState {
        config: config.clone(),
        notification_tx,
        ws_connections,
        user_repository,
        job_repository,
        notification_repository,
        chat_service,
        offer_service,
        notification_service,
    };

    let app = create_router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
