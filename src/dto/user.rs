use serde::Serialize;
use uuid::Uuid;

use crate::entities::user;

/// The signed-in user's own view of their account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub steam_profile: Option<String>,
    pub is_staff: bool,
    pub is_premium: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            bio: u.bio,
            steam_profile: u.steam_profile,
            is_staff: u.is_staff,
            is_premium: u.is_premium,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// What anyone can see about a user, with library and review totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub username: String,
    pub bio: String,
    pub steam_profile: Option<String>,
    pub is_premium: bool,
    pub joined_at: String,
    pub library_count: i64,
    pub review_count: u64,
    pub total_hours: f64,
}
