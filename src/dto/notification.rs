use serde::Serialize;
use uuid::Uuid;

use crate::entities::{NotificationKind, notification};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            // Unknown stored kinds surface as `system`.
            kind: NotificationKind::from_str(&n.kind).unwrap_or_default(),
            title: n.title,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}
