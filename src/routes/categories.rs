use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::CategoryResponse;
use crate::error::AppError;
use crate::services::catalog::{CatalogService, CategoryChanges, NewCategory};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", patch(update_category).delete(delete_category))
}

#[derive(Debug, Deserialize)]
struct ListCategoriesQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateCategoryRequest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct UpdateCategoryRequest {
    name: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

/// `GET /categories`: all categories by name.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = CatalogService::list_categories(&state.db, query.q.as_deref()).await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

async fn create_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = CatalogService::create_category(
        &state.db,
        &user,
        NewCategory {
            name: req.name,
            description: req.description,
            icon: req.icon,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

async fn update_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let updated = CatalogService::update_category(
        &state.db,
        &user,
        id,
        CategoryChanges {
            name: req.name,
            description: req.description,
            icon: req.icon,
        },
    )
    .await?;

    Ok(Json(CategoryResponse::from(updated)))
}

async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_category(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
