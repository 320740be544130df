use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::auth::middleware::{AuthUser, OptionalAuth};
use crate::dto::{GameResponse, LibraryAddResponse, PaginatedResponse, ReviewResponse};
use crate::error::AppError;
use crate::services::Pagination;
use crate::services::catalog::{CatalogService, GameChanges, GameFilter, NewGame};
use crate::services::library::{EntryDefaults, LibraryService};
use crate::services::reviews::{NewReview, ReviewFilter, ReviewService};
use crate::state::AppState;

/// Game catalog router, including the per-game library and review actions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route(
            "/{id}",
            get(get_game).patch(update_game).delete(delete_game),
        )
        .route(
            "/{id}/library",
            post(add_to_library).delete(remove_from_library),
        )
        .route("/{id}/reviews", get(list_game_reviews).post(create_game_review))
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListGamesQuery {
    q: Option<String>,
    category: Option<Uuid>,
    developer: Option<Uuid>,
    min_rating: Option<f64>,
    ordering: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    ordering: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameRequest {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    price_cents: i64,
    release_date: NaiveDate,
    cover_image_url: Option<String>,
    steam_url: Option<String>,
    developer_id: Option<Uuid>,
    #[serde(default)]
    category_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateGameRequest {
    title: Option<String>,
    description: Option<String>,
    price_cents: Option<i64>,
    release_date: Option<NaiveDate>,
    cover_image_url: Option<String>,
    steam_url: Option<String>,
    /// `null` clears the developer, absence leaves it unchanged.
    #[serde(default, deserialize_with = "present")]
    developer_id: Option<Option<Uuid>>,
    category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToLibraryRequest {
    hours_played: Option<f64>,
    is_favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CreateReviewRequest {
    rating: i32,
    comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameDetailResponse {
    #[serde(flatten)]
    game: GameResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_library: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_review: Option<ReviewResponse>,
}

/// Distinguish an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /games`: search, filter and order the catalog.
async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<PaginatedResponse<GameResponse>>, AppError> {
    let page = CatalogService::list_games(
        &state.db,
        GameFilter {
            q: query.q,
            category: query.category,
            developer: query.developer,
            min_rating: query.min_rating,
            ordering: query.ordering,
            pagination: Pagination::new(query.offset, query.limit),
        },
    )
    .await?;

    Ok(Json(PaginatedResponse::from_page(page, GameResponse::from)))
}

/// `POST /games`: staff only.
async fn create_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = CatalogService::create_game(
        &state.db,
        &user,
        NewGame {
            title: req.title,
            description: req.description,
            price_cents: req.price_cents,
            release_date: req.release_date,
            cover_image_url: req.cover_image_url,
            steam_url: req.steam_url,
            developer_id: req.developer_id,
            category_ids: req.category_ids,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(GameResponse::from(created))))
}

/// `GET /games/{id}`: when signed in, also reports library membership and
/// the caller's own review.
async fn get_game(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<GameDetailResponse>, AppError> {
    let details = CatalogService::get_game(&state.db, id).await?;

    let (in_library, user_review) = match viewer {
        Some(viewer) => (
            Some(LibraryService::contains(&state.db, viewer.id, id).await?),
            ReviewService::find_for_user(&state.db, viewer.id, id)
                .await?
                .map(ReviewResponse::from),
        ),
        None => (None, None),
    };

    Ok(Json(GameDetailResponse {
        game: GameResponse::from(details),
        in_library,
        user_review,
    }))
}

/// `PATCH /games/{id}`: staff only.
async fn update_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let updated = CatalogService::update_game(
        &state.db,
        &user,
        id,
        GameChanges {
            title: req.title,
            description: req.description,
            price_cents: req.price_cents,
            release_date: req.release_date,
            cover_image_url: req.cover_image_url,
            steam_url: req.steam_url,
            developer_id: req.developer_id,
            category_ids: req.category_ids,
        },
    )
    .await?;

    Ok(Json(GameResponse::from(updated)))
}

/// `DELETE /games/{id}`: staff only; removes the game's reviews and library entries too.
async fn delete_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_game(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /games/{id}/library`: 201 when added, 200 when it was already there.
async fn add_to_library(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<AddToLibraryRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body.unwrap_or_default();
    let addition = LibraryService::add_to_library(
        &state.db,
        &user,
        id,
        EntryDefaults {
            hours_played: req.hours_played,
            is_favorite: req.is_favorite,
        },
    )
    .await?;

    let status = if addition.already_present {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(LibraryAddResponse::from(addition))))
}

/// `DELETE /games/{id}/library`: always 204, whether or not an entry existed.
async fn remove_from_library(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LibraryService::remove_from_library(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /games/{id}/reviews`
async fn list_game_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<ReviewResponse>>, AppError> {
    CatalogService::get_game(&state.db, id).await?;

    let page = ReviewService::list_reviews(
        &state.db,
        ReviewFilter {
            game_id: Some(id),
            ordering: query.ordering,
            pagination: Pagination::new(query.offset, query.limit),
            ..ReviewFilter::default()
        },
    )
    .await?;

    Ok(Json(PaginatedResponse::from_page(page, ReviewResponse::from)))
}

/// `POST /games/{id}/reviews`
async fn create_game_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = ReviewService::create_review(
        &state.db,
        &user,
        id,
        NewReview {
            rating: req.rating,
            comment: req.comment,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(created))))
}
