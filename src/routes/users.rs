use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::dto::{PublicProfileResponse, UserResponse};
use crate::entities::user;
use crate::error::AppError;
use crate::services::library::LibraryService;
use crate::services::reviews::ReviewService;
use crate::state::AppState;

const MAX_BIO_LEN: usize = 500;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the user route group: `/users/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/{username}", get(get_public_profile))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMeRequest {
    bio: Option<String>,
    steam_profile: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /users/me`
async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// `PATCH /users/me`: edit bio and Steam profile link.
async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let mut active: user::ActiveModel = user.into();

    if let Some(bio) = body.bio {
        if bio.chars().count() > MAX_BIO_LEN {
            return Err(AppError::UnprocessableEntity(format!(
                "Bio must be at most {MAX_BIO_LEN} characters."
            )));
        }
        active.bio = Set(bio.trim().to_string());
    }
    if let Some(steam_profile) = body.steam_profile {
        let trimmed = steam_profile.trim();
        active.steam_profile = Set((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await?;
    Ok(Json(UserResponse::from(updated)))
}

/// `GET /users/{username}`: public profile with library and review totals.
async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let profile = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let library = LibraryService::stats(&state.db, profile.id).await?;
    let review_count = ReviewService::count_by_user(&state.db, profile.id).await?;

    Ok(Json(PublicProfileResponse {
        total_hours: library.hours(),
        library_count: library.total_games,
        review_count,
        username: profile.username,
        bio: profile.bio,
        steam_profile: profile.steam_profile,
        is_premium: profile.is_premium,
        joined_at: profile.created_at.to_rfc3339(),
    }))
}
