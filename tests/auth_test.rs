mod common;

use axum::http::StatusCode;
use serde_json::json;

// ──────────────────────────────────────────────────────────────────────────────
// Signup
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_success() {
    let (app, _db) = common::test_app().await;
    let (status, body) = common::post_json(
        &app,
        "/api/v1/auth/signup",
        &json!({
            "email": "Player@Example.com",
            "username": "player_one",
            "password": "SecurePass123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let json = common::parse(&body);
    assert_eq!(json["user"]["email"], "player@example.com");
    assert_eq!(json["user"]["username"], "player_one");
    assert_eq!(json["user"]["isStaff"], false);
    assert!(json["user"].get("passwordHash").is_none());
    assert!(json["token"].is_string());
}

#[tokio::test]
async fn signup_duplicate_email() {
    let (app, _db) = common::test_app().await;
    common::signup(&app, "first").await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/auth/signup",
        &json!({
            "email": "first@example.com",
            "username": "second",
            "password": "Password123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    let json = common::parse(&body);
    assert_eq!(json["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn signup_duplicate_username() {
    let (app, _db) = common::test_app().await;
    common::signup(&app, "taken_name").await;

    let (status, _body) = common::post_json(
        &app,
        "/api/v1/auth/signup",
        &json!({
            "email": "other@example.com",
            "username": "taken_name",
            "password": "Password123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let (app, _db) = common::test_app().await;
    let (status, body) = common::post_json(
        &app,
        "/api/v1/auth/signup",
        &json!({
            "email": "short@example.com",
            "username": "shorty",
            "password": "abc",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(common::parse(&body)["error"]["code"], "BAD_REQUEST");
}

// ──────────────────────────────────────────────────────────────────────────────
// Signin
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn signin_with_email_or_username() {
    let (app, _db) = common::test_app().await;
    common::signup(&app, "gamer").await;

    for login in ["gamer@example.com", "gamer"] {
        let (status, body) = common::post_json(
            &app,
            "/api/v1/auth/signin",
            &json!({ "login": login, "password": "Password123" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "signin as {login} failed: {body}");
        assert!(common::parse(&body)["token"].is_string());
    }
}

#[tokio::test]
async fn signin_wrong_password() {
    let (app, _db) = common::test_app().await;
    common::signup(&app, "gamer").await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/auth/signin",
        &json!({ "login": "gamer", "password": "WrongPassword" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(common::parse(&body)["error"]["code"], "UNAUTHORIZED");
}

// ──────────────────────────────────────────────────────────────────────────────
// Bearer tokens
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn me_requires_token() {
    let (app, _db) = common::test_app().await;
    let (status, _body) = common::get(&app, "/api/v1/users/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_rejects_garbage_token() {
    let (app, _db) = common::test_app().await;
    let (status, _body) = common::get_with_auth(&app, "/api/v1/users/me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_profile_and_accepts_updates() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::signup(&app, "profiled").await;

    let (status, body) = common::get_with_auth(&app, "/api/v1/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::parse(&body)["username"], "profiled");

    let (status, body) = common::patch_json_with_auth(
        &app,
        "/api/v1/users/me",
        &token,
        &json!({
            "bio": "Mostly roguelikes.",
            "steamProfile": "https://steamcommunity.com/id/profiled",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["bio"], "Mostly roguelikes.");
    assert_eq!(json["steamProfile"], "https://steamcommunity.com/id/profiled");
}

#[tokio::test]
async fn public_profile_reports_totals() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (token, _) = common::signup(&app, "collector").await;
    let game_id = common::create_simple_game(&app, &staff, "Celeste").await;

    common::post_json_with_auth(
        &app,
        "/api/v1/library",
        &token,
        &json!({ "gameId": game_id, "hoursPlayed": 12.5 }),
    )
    .await;
    common::post_json_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/reviews"),
        &token,
        &json!({ "rating": 5, "comment": "Tight controls." }),
    )
    .await;

    let (status, body) = common::get(&app, "/api/v1/users/collector").await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["libraryCount"], 1);
    assert_eq!(json["reviewCount"], 1);
    assert_eq!(json["totalHours"], 12.5);
    assert!(json.get("email").is_none());

    let (status, _body) = common::get(&app, "/api/v1/users/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
