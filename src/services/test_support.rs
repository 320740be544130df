//! In-memory fixtures for service unit tests.

use chrono::{NaiveDate, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel};
use uuid::Uuid;

use crate::entities::{game, user};

pub async fn memory_db() -> DatabaseConnection {
    let db = crate::db::connect("sqlite::memory:")
        .await
        .unwrap_or(DatabaseConnection::Disconnected);
    assert!(Migrator::up(&db, None).await.is_ok());
    db
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    let now = Utc::now().fixed_offset();
    let model = user::Model {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        bio: String::new(),
        steam_profile: None,
        is_staff: false,
        is_premium: false,
        created_at: now,
        updated_at: now,
    };
    let inserted = user::Entity::insert(model.clone().into_active_model())
        .exec(db)
        .await;
    assert!(inserted.is_ok());
    model
}

pub async fn seed_game(db: &DatabaseConnection, title: &str) -> game::Model {
    let now = Utc::now().fixed_offset();
    let model = game::Model {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        release_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        price_cents: 0,
        cover_image_url: None,
        steam_url: None,
        developer_id: None,
        rating: 0.0,
        total_reviews: 0,
        created_at: now,
        updated_at: now,
    };
    let inserted = game::Entity::insert(model.clone().into_active_model())
        .exec(db)
        .await;
    assert!(inserted.is_ok());
    model
}
