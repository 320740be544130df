use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{DeveloperDetailResponse, DeveloperResponse, PaginatedResponse};
use crate::error::AppError;
use crate::services::Pagination;
use crate::services::catalog::{CatalogService, DeveloperChanges, NewDeveloper};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_developers).post(create_developer))
        .route(
            "/{id}",
            get(get_developer)
                .patch(update_developer)
                .delete(delete_developer),
        )
}

#[derive(Debug, Deserialize)]
struct ListDevelopersQuery {
    q: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeveloperRequest {
    name: String,
    #[serde(default)]
    country: String,
    website: Option<String>,
    #[serde(default)]
    description: String,
    logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDeveloperRequest {
    name: Option<String>,
    country: Option<String>,
    website: Option<String>,
    description: Option<String>,
    logo_url: Option<String>,
}

/// `GET /developers`: with game counts, most prolific first.
async fn list_developers(
    State(state): State<AppState>,
    Query(query): Query<ListDevelopersQuery>,
) -> Result<Json<PaginatedResponse<DeveloperResponse>>, AppError> {
    let page = CatalogService::list_developers(
        &state.db,
        query.q.as_deref(),
        Pagination::new(query.offset, query.limit),
    )
    .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        DeveloperResponse::from,
    )))
}

async fn create_developer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateDeveloperRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = CatalogService::create_developer(
        &state.db,
        &user,
        NewDeveloper {
            name: req.name,
            country: req.country,
            website: req.website,
            description: req.description,
            logo_url: req.logo_url,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DeveloperResponse::from(created))))
}

/// `GET /developers/{id}`: the developer and its games.
async fn get_developer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeveloperDetailResponse>, AppError> {
    let details = CatalogService::get_developer(&state.db, id).await?;
    Ok(Json(DeveloperDetailResponse::from(details)))
}

async fn update_developer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDeveloperRequest>,
) -> Result<Json<DeveloperResponse>, AppError> {
    let updated = CatalogService::update_developer(
        &state.db,
        &user,
        id,
        DeveloperChanges {
            name: req.name,
            country: req.country,
            website: req.website,
            description: req.description,
            logo_url: req.logo_url,
        },
    )
    .await?;

    Ok(Json(DeveloperResponse::from(updated)))
}

/// `DELETE /developers/{id}`: the developer's games are kept, unassigned.
async fn delete_developer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_developer(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
