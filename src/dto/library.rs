use serde::Serialize;
use uuid::Uuid;

use crate::dto::GameResponse;
use crate::entities::library_entry;
use crate::services::library::{LibraryAddition, LibraryItem, LibraryStats};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameResponse>,
    pub date_added: String,
    pub hours_played: f64,
    pub is_favorite: bool,
    pub last_played: Option<String>,
}

impl From<library_entry::Model> for LibraryEntryResponse {
    fn from(e: library_entry::Model) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            game_id: e.game_id,
            game: None,
            date_added: e.date_added.to_rfc3339(),
            hours_played: e.hours_played,
            is_favorite: e.is_favorite,
            last_played: e.last_played.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<LibraryItem> for LibraryEntryResponse {
    fn from(item: LibraryItem) -> Self {
        let mut response = Self::from(item.entry);
        response.game = Some(GameResponse::from(item.game));
        response
    }
}

/// Outcome of an add-to-library request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryAddResponse {
    pub entry: LibraryEntryResponse,
    pub already_present: bool,
}

impl From<LibraryAddition> for LibraryAddResponse {
    fn from(addition: LibraryAddition) -> Self {
        Self {
            entry: LibraryEntryResponse::from(addition.entry),
            already_present: addition.already_present,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStatsResponse {
    pub total_games: i64,
    pub total_hours: f64,
}

impl From<LibraryStats> for LibraryStatsResponse {
    fn from(stats: LibraryStats) -> Self {
        Self {
            total_games: stats.total_games,
            total_hours: stats.hours(),
        }
    }
}
