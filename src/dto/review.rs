use serde::Serialize;
use uuid::Uuid;

use crate::entities::review;
use crate::services::reviews::ReviewDetails;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub game_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_title: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub is_helpful: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<review::Model> for ReviewResponse {
    fn from(r: review::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            username: None,
            game_id: r.game_id,
            game_title: None,
            rating: r.rating,
            comment: r.comment,
            is_helpful: r.is_helpful,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

impl From<ReviewDetails> for ReviewResponse {
    fn from(details: ReviewDetails) -> Self {
        let mut response = Self::from(details.review);
        response.username = Some(details.username);
        response.game_title = Some(details.game_title);
        response
    }
}
