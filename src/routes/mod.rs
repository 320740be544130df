mod auth;
mod categories;
mod developers;
mod games;
mod health;
mod home;
mod library;
mod notifications;
mod reviews;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: lightweight liveness check
/// - `/api/v1/...`: the JSON API, including a health check that pings the database
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/home", home::router())
        .nest("/games", games::router())
        .nest("/reviews", reviews::router())
        .nest("/library", library::router())
        .nest("/developers", developers::router())
        .nest("/categories", categories::router())
        .nest("/notifications", notifications::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
