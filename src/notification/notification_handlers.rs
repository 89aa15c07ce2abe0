use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    Extension, Json,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    state::AppState,
};
use super::{
    notification_dto::{
        clamp_page_size, has_more, page_offset, NotificationPage, NotificationPageParams,
        NotificationView,
    },
    notification_models::Notification,
};

/// Get a page of the authenticated user's notification inbox
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("page_size" = Option<u32>, Query, description = "Items per page (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "Page of notifications", body = NotificationPage),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Query(params): Query<NotificationPageParams>,
) -> Result<Json<NotificationPage>> {
    let page = params.page.unwrap_or(0);
    let page_size = clamp_page_size(params.page_size);

    let notifications = state
        .notification_repository
        .find_page(user_id, page_size as i64, page_offset(page, page_size))
        .await?;

    let more = has_more(notifications.len(), page_size);

    Ok(Json(NotificationPage {
        items: notifications.into_iter().map(NotificationView::from).collect(),
        page,
        page_size,
        has_more: more,
    }))
}

/// Subscribe to real-time notifications via Server-Sent Events
#[utoipa::path(
    get,
    path = "/api/notifications/stream",
    responses(
        (status = 200, description = "SSE stream of notifications"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn notification_stream(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.notification_tx.subscribe();

    let stream = tokio_stream::wrappers::BroadcastStream::new(rx)
        .filter_map(move |msg| async move {
            match msg {
                Ok(notification) if notification.user_id == user_id => {
                    let view = NotificationView::from(notification);
                    Event::default().json_data(&view).ok().map(Ok)
                }
                _ => None,
            }
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Mark a notification as read (idempotent)
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 404, description = "Notification not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>> {
    let notification = state
        .notification_repository
        .mark_as_read(notification_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}

/// Mark every notification in the user's inbox as read (idempotent)
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 204, description = "All notifications marked as read"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
) -> Result<StatusCode> {
    state
        .notification_repository
        .mark_all_as_read(user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Notification not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode> {
    let deleted = state
        .notification_repository
        .delete(notification_id, user_id)
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
