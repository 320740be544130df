use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{NotificationResponse, PaginatedResponse};
use crate::error::AppError;
use crate::services::Pagination;
use crate::services::notifications::NotificationService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/{id}/read", post(mark_read))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    unread: u64,
}

/// `GET /notifications`: newest first.
async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<NotificationResponse>>, AppError> {
    let page = NotificationService::list(
        &state.db,
        &user,
        Pagination::new(query.offset, query.limit),
    )
    .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        NotificationResponse::from,
    )))
}

async fn unread_count(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread = NotificationService::unread_count(&state.db, &user).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// `POST /notifications/{id}/read`
async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, AppError> {
    let updated = NotificationService::mark_read(&state.db, &user, id).await?;
    Ok(Json(NotificationResponse::from(updated)))
}
