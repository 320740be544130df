mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn game_rating(app: &axum::Router, game_id: &str) -> (f64, i64) {
    let (_, body) = common::get(app, &format!("/api/v1/games/{game_id}")).await;
    let json = common::parse(&body);
    (
        json["rating"].as_f64().unwrap_or(-1.0),
        json["totalReviews"].as_i64().unwrap_or(-1),
    )
}

async fn post_review(
    app: &axum::Router,
    token: &str,
    game_id: &str,
    rating: i32,
) -> (StatusCode, String) {
    common::post_json_with_auth(
        app,
        &format!("/api/v1/games/{game_id}/reviews"),
        token,
        &json!({ "rating": rating, "comment": format!("Worth a {rating}") }),
    )
    .await
}

#[tokio::test]
async fn rating_follows_review_writes() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, _) = common::signup(&app, "alice").await;
    let (bob, _) = common::signup(&app, "bob").await;
    let game = common::create_simple_game(&app, &staff, "G").await;

    assert_eq!(game_rating(&app, &game).await, (0.0, 0));

    let (status, body) = post_review(&app, &alice, &game, 5).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let alice_review = common::parse(&body)["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(game_rating(&app, &game).await, (5.0, 1));

    let (status, _) = post_review(&app, &bob, &game, 3).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game_rating(&app, &game).await, (4.0, 2));

    let (status, _) =
        common::delete_with_auth(&app, &format!("/api/v1/reviews/{alice_review}"), &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(game_rating(&app, &game).await, (3.0, 1));
}

#[tokio::test]
async fn editing_a_review_recomputes_rating() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, _) = common::signup(&app, "alice").await;
    let game = common::create_simple_game(&app, &staff, "G").await;

    let (_, body) = post_review(&app, &alice, &game, 2).await;
    let review = common::parse(&body)["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/reviews/{review}"),
        &alice,
        &json!({ "rating": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let json = common::parse(&body);
    assert_eq!(json["rating"], 4);
    assert_eq!(json["comment"], "Worth a 2");
    assert_eq!(game_rating(&app, &game).await, (4.0, 1));
}

#[tokio::test]
async fn second_review_for_same_game_conflicts() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, _) = common::signup(&app, "alice").await;
    let game = common::create_simple_game(&app, &staff, "G").await;

    post_review(&app, &alice, &game, 4).await;
    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/reviews",
        &alice,
        &json!({ "gameId": game, "rating": 1, "comment": "Changed my mind" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(common::parse(&body)["error"]["code"], "CONFLICT");
    assert_eq!(game_rating(&app, &game).await, (4.0, 1));
}

#[tokio::test]
async fn invalid_reviews_are_rejected() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, _) = common::signup(&app, "alice").await;
    let game = common::create_simple_game(&app, &staff, "G").await;

    for body in [
        json!({ "rating": 0, "comment": "Too low" }),
        json!({ "rating": 6, "comment": "Too high" }),
        json!({ "rating": 3, "comment": "   " }),
    ] {
        let (status, response) = common::post_json_with_auth(
            &app,
            &format!("/api/v1/games/{game}/reviews"),
            &alice,
            &body,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}: {response}");
    }

    assert_eq!(game_rating(&app, &game).await, (0.0, 0));
}

#[tokio::test]
async fn review_of_unknown_game_returns_404() {
    let (app, _db) = common::test_app().await;
    let (alice, _) = common::signup(&app, "alice").await;

    let (status, _) = post_review(&app, &alice, "00000000-0000-4000-8000-000000000000", 4).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_can_change_a_review() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, _) = common::signup(&app, "alice").await;
    let (bob, _) = common::signup(&app, "bob").await;
    let game = common::create_simple_game(&app, &staff, "G").await;

    let (_, body) = post_review(&app, &bob, &game, 5).await;
    let review = common::parse(&body)["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::patch_json_with_auth(
        &app,
        &format!("/api/v1/reviews/{review}"),
        &alice,
        &json!({ "rating": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(common::parse(&body)["error"]["code"], "FORBIDDEN");

    let (status, _) =
        common::delete_with_auth(&app, &format!("/api/v1/reviews/{review}"), &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(game_rating(&app, &game).await, (5.0, 1));
}

#[tokio::test]
async fn list_and_get_reviews() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, alice_id) = common::signup(&app, "alice").await;
    let (bob, _) = common::signup(&app, "bob").await;
    let first = common::create_simple_game(&app, &staff, "First").await;
    let second = common::create_simple_game(&app, &staff, "Second").await;

    post_review(&app, &alice, &first, 2).await;
    post_review(&app, &alice, &second, 5).await;
    let (_, body) = post_review(&app, &bob, &first, 4).await;
    let bob_review = common::parse(&body)["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = common::get(&app, "/api/v1/reviews?ordering=-rating").await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["total"], 3);
    let ratings: Vec<i64> = json["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|r| r["rating"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ratings, [5, 4, 2]);

    let (_, body) = common::get(&app, &format!("/api/v1/reviews?user={alice_id}")).await;
    assert_eq!(common::parse(&body)["total"], 2);

    let (_, body) = common::get(&app, "/api/v1/reviews?rating=4").await;
    assert_eq!(common::parse(&body)["total"], 1);

    let (status, body) = common::get(&app, &format!("/api/v1/games/{first}/reviews")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::parse(&body)["total"], 2);

    let (status, body) = common::get(&app, &format!("/api/v1/reviews/{bob_review}")).await;
    assert_eq!(status, StatusCode::OK);
    let json = common::parse(&body);
    assert_eq!(json["username"], "bob");
    assert_eq!(json["gameTitle"], "First");
}

#[tokio::test]
async fn game_detail_shows_viewer_review_and_library_state() {
    let (app, db) = common::test_app().await;
    let staff = common::signup_staff(&app, &db, "curator").await;
    let (alice, _) = common::signup(&app, "alice").await;
    let game = common::create_simple_game(&app, &staff, "G").await;

    let (_, body) = common::get_with_auth(&app, &format!("/api/v1/games/{game}"), &alice).await;
    let json = common::parse(&body);
    assert_eq!(json["inLibrary"], false);
    assert!(json.get("userReview").is_none());

    post_review(&app, &alice, &game, 3).await;
    common::post_json_with_auth(&app, &format!("/api/v1/games/{game}/library"), &alice, &json!({})).await;

    let (_, body) = common::get_with_auth(&app, &format!("/api/v1/games/{game}"), &alice).await;
    let json = common::parse(&body);
    assert_eq!(json["inLibrary"], true);
    assert_eq!(json["userReview"]["rating"], 3);
}
