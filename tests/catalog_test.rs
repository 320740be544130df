mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

async fn create_developer(app: &axum::Router, staff: &str, name: &str, country: &str) -> String {
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/developers",
        staff,
        &json!({ "name": name, "country": country }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create developer failed: {body}");
    common::parse(&body)["id"].as_str().unwrap_or_default().to_string()
}

async fn category_id(app: &axum::Router, name: &str) -> String {
    let (_, body) = common::get(app, "/api/v1/categories").await;
    common::parse(&body)
        .as_array()
        .and_then(|all| all.iter().find(|c| c["name"] == name))
        .and_then(|c| c["id"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn titles(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|g| g["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ──────────────────────────────────────────────────────────────────────────────
// Permissions
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_staff_cannot_manage_catalog() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::signup(&app, "regular").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/games",
        &token,
        &json!({ "title": "Nope", "releaseDate": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(common::parse(&body)["error"]["code"], "FORBIDDEN");

    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/developers",
        &token,
        &json!({ "name": "Studio" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/categories",
        &token,
        &json!({ "name": "Horror" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_catalog_write_is_unauthorized() {
    let (app, _db) = common::test_app().await;
    let (status, _) = common::post_json(
        &app,
        "/api/v1/games",
        &json!({ "title": "Nope", "releaseDate": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ──────────────────────────────────────────────────────────────────────────────
// Games
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_game_with_developer_and_categories() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let developer = create_developer(&app, &staff, "Supergiant Games", "USA").await;
    let action = category_id(&app, "Action").await;
    let rpg = category_id(&app, "RPG").await;

    let id = common::create_game(
        &app,
        &staff,
        &json!({
            "title": "Hades",
            "description": "Battle out of hell.",
            "priceCents": 2499,
            "releaseDate": "2020-09-17",
            "developerId": developer,
            "categoryIds": [action, rpg, action],
        }),
    )
    .await;

    let (status, body) = common::get(&app, &format!("/api/v1/games/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["title"], "Hades");
    assert_eq!(json["releaseDate"], "2020-09-17");
    assert_eq!(json["priceCents"], 2499);
    assert_eq!(json["rating"], 0.0);
    assert_eq!(json["totalReviews"], 0);
    assert_eq!(json["developer"]["name"], "Supergiant Games");
    assert_eq!(json["categories"].as_array().map(Vec::len), Some(2));
    assert!(json.get("inLibrary").is_none());
}

#[tokio::test]
async fn create_game_validation() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;

    let cases = [
        json!({ "title": "   ", "releaseDate": "2024-01-01" }),
        json!({ "title": "Cheap", "priceCents": -1, "releaseDate": "2024-01-01" }),
        json!({
            "title": "Ghost",
            "releaseDate": "2024-01-01",
            "developerId": "00000000-0000-4000-8000-000000000000",
        }),
        json!({
            "title": "Ghost",
            "releaseDate": "2024-01-01",
            "categoryIds": ["00000000-0000-4000-8000-000000000000"],
        }),
    ];

    for case in &cases {
        let (status, body) =
            common::post_json_with_auth(&app, "/api/v1/games", &staff, case).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{case}: {body}");
        assert_eq!(common::parse(&body)["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn update_game_fields_and_clear_developer() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let developer = create_developer(&app, &staff, "Team Cherry", "Australia").await;
    let id = common::create_game(
        &app,
        &staff,
        &json!({ "title": "Hollow Knight", "releaseDate": "2017-02-24", "developerId": developer }),
    )
    .await;

    let (status, body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/games/{id}"),
        &staff,
        &json!({ "priceCents": 1499, "developerId": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let json = common::parse(&body);
    assert_eq!(json["priceCents"], 1499);
    assert_eq!(json["title"], "Hollow Knight");
    assert!(json["developerId"].is_null());
}

#[tokio::test]
async fn get_missing_game_returns_404() {
    let (app, _db) = common::test_app().await;
    let (status, body) =
        common::get(&app, "/api/v1/games/00000000-0000-4000-8000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(common::parse(&body)["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_games_search_filter_and_order() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let developer = create_developer(&app, &staff, "ConcernedApe", "USA").await;
    let puzzle = category_id(&app, "Puzzle").await;

    common::create_game(
        &app,
        &staff,
        &json!({ "title": "Stardew Valley", "releaseDate": "2016-02-26", "developerId": developer }),
    )
    .await;
    common::create_game(
        &app,
        &staff,
        &json!({ "title": "Portal 2", "releaseDate": "2011-04-19", "categoryIds": [puzzle] }),
    )
    .await;
    common::create_game(
        &app,
        &staff,
        &json!({ "title": "Baba Is You", "description": "A puzzle about rules.", "releaseDate": "2019-03-13", "categoryIds": [puzzle] }),
    )
    .await;

    // Default ordering: newest release first.
    let (status, body) = common::get(&app, "/api/v1/games").await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["total"], 3);
    assert_eq!(json["limit"], 20);
    assert_eq!(titles(&json), ["Baba Is You", "Stardew Valley", "Portal 2"]);

    let (_, body) = common::get(&app, "/api/v1/games?ordering=title").await;
    assert_eq!(
        titles(&common::parse(&body)),
        ["Baba Is You", "Portal 2", "Stardew Valley"]
    );

    // Search reaches description and developer name, case-insensitively.
    let (_, body) = common::get(&app, "/api/v1/games?q=PUZZLE").await;
    assert_eq!(titles(&common::parse(&body)), ["Baba Is You"]);
    let (_, body) = common::get(&app, "/api/v1/games?q=concerned").await;
    assert_eq!(titles(&common::parse(&body)), ["Stardew Valley"]);

    let (_, body) = common::get(&app, &format!("/api/v1/games?category={puzzle}&ordering=-title")).await;
    assert_eq!(titles(&common::parse(&body)), ["Portal 2", "Baba Is You"]);

    let (_, body) = common::get(&app, &format!("/api/v1/games?developer={developer}")).await;
    assert_eq!(titles(&common::parse(&body)), ["Stardew Valley"]);

    let (_, body) = common::get(&app, "/api/v1/games?limit=1&offset=1").await;
    let json = common::parse(&body);
    assert_eq!(json["total"], 3);
    assert_eq!(titles(&json), ["Stardew Valley"]);
}

#[tokio::test]
async fn min_rating_filter_uses_derived_rating() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (reviewer, _) = common::signup(&app, "reviewer").await;
    let loved = common::create_simple_game(&app, &staff, "Loved").await;
    common::create_simple_game(&app, &staff, "Unrated").await;

    common::post_json_with_auth(
        &app,
        &format!("/api/v1/games/{loved}/reviews"),
        &reviewer,
        &json!({ "rating": 5, "comment": "Great" }),
    )
    .await;

    let (_, body) = common::get(&app, "/api/v1/games?min_rating=4").await;
    assert_eq!(titles(&common::parse(&body)), ["Loved"]);
}

#[tokio::test]
async fn delete_game_cascades_entries_and_reviews() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (player, _) = common::signup(&app, "player").await;
    let id = common::create_simple_game(&app, &staff, "Doomed").await;

    common::post_json_with_auth(&app, &format!("/api/v1/games/{id}/library"), &player, &json!({})).await;
    common::post_json_with_auth(
        &app,
        &format!("/api/v1/games/{id}/reviews"),
        &player,
        &json!({ "rating": 2, "comment": "Meh" }),
    )
    .await;

    let (status, _) = common::delete_with_auth(&app, &format!("/api/v1/games/{id}"), &staff).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get(&app, &format!("/api/v1/games/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = common::get_with_auth(&app, "/api/v1/library", &player).await;
    assert_eq!(common::parse(&body)["total"], 0);
    let (_, body) = common::get(&app, "/api/v1/reviews").await;
    assert_eq!(common::parse(&body)["total"], 0);
}

#[tokio::test]
async fn home_lists_games() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    for title in ["One", "Two", "Three"] {
        common::create_simple_game(&app, &staff, title).await;
    }

    let (status, body) = common::get(&app, "/api/v1/home").await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    for listing in ["featured", "recent", "popular"] {
        assert_eq!(json[listing].as_array().map(Vec::len), Some(3), "{listing}");
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Developers
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn developers_list_with_game_counts() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let small = create_developer(&app, &staff, "Small Studio", "Canada").await;
    let big = create_developer(&app, &staff, "Big Studio", "Japan").await;

    for title in ["A", "B"] {
        common::create_game(
            &app,
            &staff,
            &json!({ "title": title, "releaseDate": "2022-01-01", "developerId": big }),
        )
        .await;
    }
    common::create_game(
        &app,
        &staff,
        &json!({ "title": "C", "releaseDate": "2022-01-01", "developerId": small }),
    )
    .await;
    create_developer(&app, &staff, "Idle Studio", "Canada").await;

    let (status, body) = common::get(&app, "/api/v1/developers").await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["total"], 3);
    assert_eq!(json["data"][0]["name"], "Big Studio");
    assert_eq!(json["data"][0]["gameCount"], 2);
    assert_eq!(json["data"][1]["gameCount"], 1);
    assert_eq!(json["data"][2]["gameCount"], 0);

    let (_, body) = common::get(&app, "/api/v1/developers?q=canada").await;
    assert_eq!(common::parse(&body)["total"], 2);

    let (status, body) = common::get(&app, &format!("/api/v1/developers/{big}")).await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["name"], "Big Studio");
    assert_eq!(json["games"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn deleting_developer_keeps_its_games() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let developer = create_developer(&app, &staff, "Gone Studio", "France").await;
    let game = common::create_game(
        &app,
        &staff,
        &json!({ "title": "Survivor", "releaseDate": "2021-06-01", "developerId": developer }),
    )
    .await;

    let (status, _) =
        common::delete_with_auth(&app, &format!("/api/v1/developers/{developer}"), &staff).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = common::get(&app, &format!("/api/v1/games/{game}")).await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert!(json["developerId"].is_null());
    assert!(json.get("developer").is_none());
}

// ──────────────────────────────────────────────────────────────────────────────
// Categories
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_categories_are_listed() {
    let (app, _db) = common::test_app().await;
    let (status, body) = common::get(&app, "/api/v1/categories").await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json.as_array().map(Vec::len), Some(8));
    assert_eq!(json[0]["name"], "Action");

    let (_, body) = common::get(&app, "/api/v1/categories?q=rac").await;
    assert_eq!(common::parse(&body)[0]["name"], "Racing");
}

#[tokio::test]
async fn category_names_are_unique() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/categories",
        &staff,
        &json!({ "name": "RPG" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/categories",
        &staff,
        &json!({ "name": "Horror", "icon": "ghost" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let horror = common::parse(&body)["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/categories/{horror}"),
        &staff,
        &json!({ "name": "Action" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) =
        common::delete_with_auth(&app, &format!("/api/v1/categories/{horror}"), &staff).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
