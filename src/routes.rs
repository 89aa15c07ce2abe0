use crate::{
    auth, chat, job,
    middleware::auth_middleware,
    notification, offer,
    state::AppState,
    websocket::ws_handler,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::auth_handlers::register,
        crate::auth::auth_handlers::login,
        crate::job::job_handlers::create_job,
        crate::job::job_handlers::get_jobs,
        crate::job::job_handlers::get_job,
        crate::chat::chat_handlers::get_chats,
        crate::chat::chat_handlers::open_chat,
        crate::chat::chat_handlers::get_chat,
        crate::chat::chat_handlers::send_message,
        crate::chat::chat_handlers::mark_chat_read,
        crate::offer::offer_handlers::create_offer,
        crate::offer::offer_handlers::get_chat_offers,
        crate::offer::offer_handlers::respond_to_offer,
        crate::offer::offer_handlers::confirm_payment,
        crate::notification::notification_handlers::get_notifications,
        crate::notification::notification_handlers::notification_stream,
        crate::notification::notification_handlers::mark_notification_read,
        crate::notification::notification_handlers::mark_all_notifications_read,
        crate::notification::notification_handlers::delete_notification,
    ),
    components(
        schemas(
            auth::auth_dto::RegisterRequest,
            auth::auth_dto::LoginRequest,
            auth::auth_dto::AuthResponse,
            crate::user::user_models::UserResponse,
            job::job_dto::CreateJobRequest,
            job::job_models::Job,
            chat::chat_dto::OpenChatRequest,
            chat::chat_dto::AttachmentUpload,
            chat::chat_dto::SendMessageRequest,
            chat::chat_dto::PartyView,
            chat::chat_dto::ConversationView,
            chat::chat_models::Chat,
            chat::chat_models::Message,
            offer::offer_dto::CreateOfferRequest,
            offer::offer_dto::RespondOfferRequest,
            offer::offer_dto::OfferResolution,
            offer::offer_models::Offer,
            offer::offer_models::OfferStatus,
            notification::notification_models::Notification,
            notification::notification_models::NotificationKind,
            notification::notification_dto::NotificationView,
            notification::notification_dto::NotificationPage,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "jobs", description = "Job posting endpoints"),
        (name = "chats", description = "Conversation and message endpoints"),
        (name = "offers", description = "Offer negotiation endpoints"),
        (name = "notifications", description = "Notification inbox endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected routes (auth required)
    let job_routes = Router::new()
        .route("/", get(job::get_jobs).post(job::create_job))
        .route("/:id", get(job::get_job))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The service enforces the 10 MB attachment bound; the request limit
    // only needs headroom for base64 and JSON framing on top of that.
    let chat_routes = Router::new()
        .route("/", get(chat::get_chats).post(chat::open_chat))
        .route("/:id", get(chat::get_chat))
        .route("/:id/messages", post(chat::send_message))
        .route("/:id/read", post(chat::mark_chat_read))
        .route(
            "/:id/offers",
            get(offer::get_chat_offers).post(offer::create_offer),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(15 * 1024 * 1024));

    let offer_routes = Router::new()
        .route("/:id/respond", post(offer::respond_to_offer))
        .route("/:id/paid", post(offer::confirm_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route("/", get(notification::get_notifications))
        .route("/stream", get(notification::notification_stream))
        .route("/:id/read", patch(notification::mark_notification_read))
        .route("/read-all", post(notification::mark_all_notifications_read))
        .route("/:id", delete(notification::delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let ws_routes = Router::new()
        .route("/ws", get(ws_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/jobs", job_routes)
        .nest("/chats", chat_routes)
        .nest("/offers", offer_routes)
        .nest("/notifications", notification_routes)
        .merge(ws_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.storage_root))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::create_access_token,
        state::Config,
        storage::LocalObjectStore,
        websocket::ConnectionManager,
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use base64::Engine;
    use std::{sync::Arc, time::Duration};
    use tokio::sync::broadcast;
    use tower::ServiceExt;
    use uuid::Uuid;

    // A router over a lazy pool: requests pass the HTTP layers for real and
    // only fail once a handler touches the (unreachable) database.
    fn test_state() -> AppState {
        let db = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy("postgres://localhost/unreachable")
            .expect("lazy pool");
        let config = Arc::new(Config {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            storage_root: "./uploads".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        });
        let ws_connections = ConnectionManager::new();
        let (notification_tx, _) = broadcast::channel(8);
        let store = Arc::new(LocalObjectStore::new(
            config.storage_root.clone(),
            config.public_base_url.clone(),
        ));

        let user_repository = crate::user::UserRepository::new(db.clone());
        let job_repository = crate::job::JobRepository::new(db.clone());
        let chat_repository = crate::chat::ChatRepository::new(db.clone());
        let offer_repository = crate::offer::OfferRepository::new(db.clone());
        let notification_repository = crate::notification::NotificationRepository::new(db.clone());

        let notification_service = crate::notification::NotificationService::new(
            notification_repository.clone(),
            notification_tx.clone(),
            ws_connections.clone(),
        );
        let chat_service = crate::chat::ChatService::new(
            chat_repository.clone(),
            offer_repository.clone(),
            job_repository.clone(),
            user_repository.clone(),
            store,
            notification_service.clone(),
            ws_connections.clone(),
        );
        let offer_service = crate::offer::OfferService::new(
            offer_repository,
            chat_repository,
            notification_service.clone(),
            ws_connections.clone(),
        );

        AppState {
            config,
            notification_tx,
            ws_connections,
            user_repository,
            job_repository,
            notification_repository,
            chat_service,
            offer_service,
            notification_service,
        }
    }

    fn bearer(state: &AppState) -> String {
        let token = create_access_token(
            Uuid::new_v4(),
            "client@example.com",
            "client",
            &state.config.jwt_secret,
            1,
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn test_attachment_sized_body_clears_the_request_limit() {
        let state = test_state();
        let auth = bearer(&state);
        let app = create_router(state);

        let data = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 2 * 1024 * 1024]);
        let body = serde_json::json!({
            "content": "See attached",
            "attachment": {
                "file_name": "photo.png",
                "content_type": "image/png",
                "data": data,
            }
        })
        .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/chats/{}/messages", Uuid::new_v4()))
                    .header(header::AUTHORIZATION, auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        // The body must get past the request size limit so the 10 MB
        // attachment bound is what actually governs; the request then fails
        // on the unreachable database, not on size.
        assert_ne!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_payment_confirmation_requires_auth() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/offers/{}/paid", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
