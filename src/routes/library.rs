use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    LibraryAddResponse, LibraryEntryResponse, LibraryStatsResponse, PaginatedResponse,
};
use crate::error::AppError;
use crate::services::Pagination;
use crate::services::export::{EXPORT_FILENAME, export_library_csv};
use crate::services::library::{EntryChanges, EntryDefaults, LibraryFilter, LibraryService};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// The signed-in user's library: `/library/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(add_entry))
        .route("/stats", get(stats))
        .route("/export", get(export_csv))
        .route(
            "/{id}",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListLibraryQuery {
    favorite: Option<bool>,
    q: Option<String>,
    ordering: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddEntryRequest {
    game_id: Uuid,
    hours_played: Option<f64>,
    is_favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEntryRequest {
    hours_played: Option<f64>,
    is_favorite: Option<bool>,
    last_played: Option<DateTime<FixedOffset>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /library`
async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListLibraryQuery>,
) -> Result<Json<PaginatedResponse<LibraryEntryResponse>>, AppError> {
    let page = LibraryService::list_entries(
        &state.db,
        &user,
        LibraryFilter {
            favorites_only: query.favorite.unwrap_or(false),
            q: query.q,
            ordering: query.ordering,
            pagination: Pagination::new(query.offset, query.limit),
        },
    )
    .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        LibraryEntryResponse::from,
    )))
}

/// `POST /library`: idempotent; 201 when added, 200 when already present.
async fn add_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<AddEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let addition = LibraryService::add_to_library(
        &state.db,
        &user,
        req.game_id,
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

/// `GET /library/stats`
async fn stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<LibraryStatsResponse>, AppError> {
    let stats = LibraryService::stats(&state.db, user.id).await?;
    Ok(Json(LibraryStatsResponse::from(stats)))
}

/// `GET /library/export`: the library as a CSV download.
async fn export_csv(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let body = export_library_csv(&state.db, &user).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}

/// `GET /library/{id}`
async fn get_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LibraryEntryResponse>, AppError> {
    let item = LibraryService::get_entry(&state.db, &user, id).await?;
    Ok(Json(LibraryEntryResponse::from(item)))
}

/// `PATCH /library/{id}`
async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<LibraryEntryResponse>, AppError> {
    let updated = LibraryService::update_entry(
        &state.db,
        &user,
        id,
        EntryChanges {
            hours_played: req.hours_played,
            is_favorite: req.is_favorite,
            last_played: req.last_played,
        },
    )
    .await?;

    Ok(Json(LibraryEntryResponse::from(updated)))
}

/// `DELETE /library/{id}`
async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LibraryService::delete_entry(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
