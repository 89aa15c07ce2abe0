use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{error::Result, state::AppState};
use super::{
    chat_dto::{ConversationView, OpenChatRequest, SendMessageRequest},
    chat_models::Message,
};

/// List the authenticated user's conversations, most recently active first
#[utoipa::path(
    get,
    path = "/api/chats",
    responses(
        (status = 200, description = "Conversation directory", body = Vec<ConversationView>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "chats",
    security(("bearer_auth" = []))
)]
pub async fn get_chats(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<ConversationView>>> {
    let conversations = state.chat_service.list_conversations(user_id).await?;
    Ok(Json(conversations))
}

/// Open (or reuse) a conversation with the other party about a job
#[utoipa::path(
    post,
    path = "/api/chats",
    request_body = OpenChatRequest,
    responses(
        (status = 200, description = "Conversation", body = ConversationView),
        (status = 403, description = "Not a valid party pairing"),
        (status = 404, description = "Job not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "chats",
    security(("bearer_auth" = []))
)]
pub async fn open_chat(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<OpenChatRequest>,
) -> Result<Json<ConversationView>> {
    let conversation = state.chat_service.open_conversation(user_id, payload).await?;
    Ok(Json(conversation))
}

/// Get one conversation with messages, offers and unread count
#[utoipa::path(
    get,
    path = "/api/chats/{id}",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Conversation", body = ConversationView),
        (status = 403, description = "Not a party of this conversation"),
        (status = 404, description = "Chat not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "chats",
    security(("bearer_auth" = []))
)]
pub async fn get_chat(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ConversationView>> {
    let conversation = state.chat_service.get_conversation(user_id, chat_id).await?;
    Ok(Json(conversation))
}

/// Send a message, optionally with an attachment (max 10 MB)
#[utoipa::path(
    post,
    path = "/api/chats/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Empty message or oversized attachment"),
        (status = 403, description = "Not a party of this conversation"),
        (status = 404, description = "Chat not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "chats",
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(chat_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state.chat_service.send_message(user_id, chat_id, payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Mark every message addressed to the user in this chat as read
#[utoipa::path(
    post,
    path = "/api/chats/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Chat ID")
    ),
    responses(
        (status = 204, description = "Conversation marked read"),
        (status = 403, description = "Not a party of this conversation"),
        (status = 404, description = "Chat not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "chats",
    security(("bearer_auth" = []))
)]
pub async fn mark_chat_read(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(chat_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.chat_service.mark_read(user_id, chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
