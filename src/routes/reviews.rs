use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{PaginatedResponse, ReviewResponse};
use crate::error::AppError;
use crate::services::Pagination;
use crate::services::reviews::{NewReview, ReviewChanges, ReviewFilter, ReviewService};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
}

#[derive(Debug, Deserialize)]
struct ListReviewsQuery {
    game: Option<Uuid>,
    user: Option<Uuid>,
    rating: Option<i32>,
    ordering: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReviewRequest {
    game_id: Uuid,
    rating: i32,
    comment: String,
}

#[derive(Debug, Deserialize)]
struct UpdateReviewRequest {
    rating: Option<i32>,
    comment: Option<String>,
}

/// `GET /reviews`: filter by `game`, `user` or `rating`; order by
/// `created_at` or `rating`.
async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> Result<Json<PaginatedResponse<ReviewResponse>>, AppError> {
    let page = ReviewService::list_reviews(
        &state.db,
        ReviewFilter {
            game_id: query.game,
            user_id: query.user,
            rating: query.rating,
            ordering: query.ordering,
            pagination: Pagination::new(query.offset, query.limit),
        },
    )
    .await?;

    Ok(Json(PaginatedResponse::from_page(page, ReviewResponse::from)))
}

/// `POST /reviews`
async fn create_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = ReviewService::create_review(
        &state.db,
        &user,
        req.game_id,
        NewReview {
            rating: req.rating,
            comment: req.comment,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(created))))
}

/// `GET /reviews/{id}`
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let details = ReviewService::get_review(&state.db, id).await?;
    Ok(Json(ReviewResponse::from(details)))
}

/// `PATCH /reviews/{id}`: author only.
async fn update_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let updated = ReviewService::update_review(
        &state.db,
        &user,
        id,
        ReviewChanges {
            rating: req.rating,
            comment: req.comment,
        },
    )
    .await?;

    Ok(Json(ReviewResponse::from(updated)))
}

/// `DELETE /reviews/{id}`: author only.
async fn delete_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ReviewService::delete_review(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
