use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::notification_models::{Notification, NotificationKind};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationPageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationView {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub job_id: Option<Uuid>,
    pub chat_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub target: String,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        let target = n.target();
        Self {
            id: n.id,
            kind: n.kind,
            message: n.message,
            job_id: n.job_id,
            chat_id: n.chat_id,
            offer_id: n.offer_id,
            is_read: n.is_read,
            created_at: n.created_at,
            target,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationPage {
    pub items: Vec<NotificationView>,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

pub fn clamp_page_size(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

pub fn page_offset(page: u32, page_size: u32) -> i64 {
    page as i64 * page_size as i64
}

/// A page is full exactly when more pages may follow; a short page is the
/// last one.
pub fn has_more(returned: usize, page_size: u32) -> bool {
    returned == page_size as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_over_45_items_with_page_size_20() {
        // Pages of a 45-item inbox: 20, 20, 5.
        let lens = [20usize, 20, 5];
        let expected_has_more = [true, true, false];
        for (len, expected) in lens.iter().zip(expected_has_more) {
            assert_eq!(has_more(*len, 20), expected);
        }
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0, 20), 0);
        assert_eq!(page_offset(2, 20), 40);
    }

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(500)), MAX_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(50)), 50);
    }
}
