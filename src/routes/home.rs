use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::HomeResponse;
use crate::error::AppError;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// `GET /home`: featured, recently released and most reviewed games.
async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let listings = CatalogService::home(&state.db).await?;
    Ok(Json(HomeResponse::from(listings)))
}
