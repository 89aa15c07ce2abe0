use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    websocket::types::{ClientMessage, ErrorPayload, TypingPayload, WsMessage},
};

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, user_id: Uuid, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    state.ws_connections.add_connection(user_id, tx.clone());

    // Pump outbound frames from the channel onto the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Process inbound frames
    let state_clone = state.clone();
    let tx_clone = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Text(text) = msg {
                if let Err(e) = process_client_message(&text, user_id, &state_clone).await {
                    tracing::debug!("WebSocket frame rejected: {:?}", e);
                    let error_msg = WsMessage::Error(ErrorPayload {
                        message: e.to_string(),
                    });
                    let _ = tx_clone.send(error_msg);
                }
            } else if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Connection release runs on every exit path
    state.ws_connections.remove_connection(&user_id);

    tracing::info!("WebSocket connection closed for user {}", user_id);
}

async fn process_client_message(text: &str, user_id: Uuid, state: &AppState) -> Result<()> {
    let client_msg: ClientMessage = serde_json::from_str(text)
        .map_err(|e| AppError::BadRequest(format!("Invalid message format: {}", e)))?;

    match client_msg {
        ClientMessage::Typing { chat_id, is_typing } => {
            // Ephemeral relay to the counterparty only; nothing persists and
            // dropped frames are acceptable.
            let chat = state.chat_service.require_party(user_id, chat_id).await?;
            let typing = WsMessage::Typing(TypingPayload {
                chat_id,
                user_id,
                is_typing,
            });
            state
                .ws_connections
                .send_to_user(&chat.counterparty(user_id), typing);
        }
        ClientMessage::MarkRead { chat_id } => {
            // A viewer with the conversation open marks incoming messages
            // read as they arrive.
            state.chat_service.mark_read(user_id, chat_id).await?;
        }
    }

    Ok(())
}
