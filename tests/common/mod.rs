#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::{Value, json};
use tower::ServiceExt;

use game_library_api::config::{Config, Environment};
use game_library_api::entities::user;
use game_library_api::state::AppState;

/// Configuration used by every test app.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_expiration_secs: 900,
        frontend_url: "http://localhost:3001".to_string(),
    }
}

/// A fresh migrated in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let db = game_library_api::db::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();
    db
}

/// The app router over a fresh database, plus a handle to that database.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = test_db().await;
    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };
    (game_library_api::routes::router().with_state(state), db)
}

/// Send a request and return (status, headers, body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_default();

    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();

    (status, headers, String::from_utf8(bytes.to_vec()).unwrap_or_default())
}

/// Test helper: send a GET request and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = send(app, Method::GET, uri, None, None).await;
    (status, body)
}

pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let (status, _, body) = send(app, Method::GET, uri, Some(token), None).await;
    (status, body)
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, String) {
    let (status, _, body) = send(app, Method::POST, uri, None, Some(body)).await;
    (status, body)
}

pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: &Value,
) -> (StatusCode, String) {
    let (status, _, body) = send(app, Method::POST, uri, Some(token), Some(body)).await;
    (status, body)
}

pub async fn patch_json_with_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: &Value,
) -> (StatusCode, String) {
    let (status, _, body) = send(app, Method::PATCH, uri, Some(token), Some(body)).await;
    (status, body)
}

pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let (status, _, body) = send(app, Method::DELETE, uri, Some(token), None).await;
    (status, body)
}

pub fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}

/// Sign up `username` and return (`token`, `user id`).
pub async fn signup(app: &Router, username: &str) -> (String, String) {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/signup",
        &json!({
            "email": format!("{username}@example.com"),
            "username": username,
            "password": "Password123",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

    let json = parse(&body);
    (
        json["token"].as_str().unwrap_or_default().to_string(),
        json["user"]["id"].as_str().unwrap_or_default().to_string(),
    )
}

/// Sign up `username` and grant staff rights directly in the database.
pub async fn signup_staff(app: &Router, db: &DatabaseConnection, username: &str) -> String {
    let (token, _) = signup(app, username).await;
    let granted = user::Entity::update_many()
        .col_expr(user::Column::IsStaff, Expr::value(true))
        .filter(user::Column::Username.eq(username))
        .exec(db)
        .await;
    assert!(granted.is_ok(), "failed to grant staff: {granted:?}");
    token
}

/// Create a game through the API as staff and return its id.
pub async fn create_game(app: &Router, staff_token: &str, body: &Value) -> String {
    let (status, body) = post_json_with_auth(app, "/api/v1/games", staff_token, body).await;
    assert_eq!(status, StatusCode::CREATED, "create game failed: {body}");
    parse(&body)["id"].as_str().unwrap_or_default().to_string()
}

/// Create a minimal game titled `title`.
pub async fn create_simple_game(app: &Router, staff_token: &str, title: &str) -> String {
    create_game(
        app,
        staff_token,
        &json!({
            "title": title,
            "description": format!("{title} description"),
            "priceCents": 1999,
            "releaseDate": "2024-05-01",
        }),
    )
    .await
}
