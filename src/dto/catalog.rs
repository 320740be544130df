use serde::Serialize;
use uuid::Uuid;

use crate::entities::{category, developer, game};
use crate::services::catalog::{DeveloperDetails, DeveloperSummary, GameDetails, HomeListings};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            icon: c.icon,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperResponse {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub website: Option<String>,
    pub description: String,
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_count: Option<i64>,
}

impl From<developer::Model> for DeveloperResponse {
    fn from(d: developer::Model) -> Self {
        Self {
            id: d.id,
            name: d.name,
            country: d.country,
            website: d.website,
            description: d.description,
            logo_url: d.logo_url,
            game_count: None,
        }
    }
}

impl From<DeveloperSummary> for DeveloperResponse {
    fn from(d: DeveloperSummary) -> Self {
        Self {
            id: d.id,
            name: d.name,
            country: d.country,
            website: d.website,
            description: d.description,
            logo_url: d.logo_url,
            game_count: Some(d.game_count),
        }
    }
}

/// Catalog game. `developer` and `categories` are present whenever the game
/// was loaded through the catalog service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub release_date: String,
    pub price_cents: i64,
    pub cover_image_url: Option<String>,
    pub steam_url: Option<String>,
    pub developer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<DeveloperResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryResponse>>,
    pub rating: f64,
    pub total_reviews: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<game::Model> for GameResponse {
    fn from(g: game::Model) -> Self {
        Self {
            id: g.id,
            title: g.title,
            description: g.description,
            release_date: g.release_date.format("%Y-%m-%d").to_string(),
            price_cents: g.price_cents,
            cover_image_url: g.cover_image_url,
            steam_url: g.steam_url,
            developer_id: g.developer_id,
            developer: None,
            categories: None,
            rating: g.rating,
            total_reviews: g.total_reviews,
            created_at: g.created_at.to_rfc3339(),
            updated_at: g.updated_at.to_rfc3339(),
        }
    }
}

impl From<GameDetails> for GameResponse {
    fn from(details: GameDetails) -> Self {
        let mut response = Self::from(details.game);
        response.developer = details.developer.map(DeveloperResponse::from);
        response.categories = Some(
            details
                .categories
                .into_iter()
                .map(CategoryResponse::from)
                .collect(),
        );
        response
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDetailResponse {
    #[serde(flatten)]
    pub developer: DeveloperResponse,
    pub games: Vec<GameResponse>,
}

impl From<DeveloperDetails> for DeveloperDetailResponse {
    fn from(details: DeveloperDetails) -> Self {
        let mut developer = DeveloperResponse::from(details.developer);
        developer.game_count = i64::try_from(details.games.len()).ok();
        Self {
            developer,
            games: details.games.into_iter().map(GameResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub featured: Vec<GameResponse>,
    pub recent: Vec<GameResponse>,
    pub popular: Vec<GameResponse>,
}

impl From<HomeListings> for HomeResponse {
    fn from(home: HomeListings) -> Self {
        let convert = |games: Vec<GameDetails>| -> Vec<GameResponse> {
            games.into_iter().map(GameResponse::from).collect()
        };
        Self {
            featured: convert(home.featured),
            recent: convert(home.recent),
            popular: convert(home.popular),
        }
    }
}
