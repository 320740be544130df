use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{developer, game, library_entry, user};
use crate::error::AppError;

/// Download name offered for a library export.
pub const EXPORT_FILENAME: &str = "my_library.csv";

const HEADER: [&str; 5] = ["Game", "Developer", "Hours Played", "Favorite", "Date Added"];

/// One exported library line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub game_title: String,
    pub developer_name: Option<String>,
    pub hours_played: f64,
    pub is_favorite: bool,
    pub date_added: DateTime<FixedOffset>,
}

/// Render `owner`'s library as CSV, oldest addition first.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if a query or the CSV writer fails.
pub async fn export_library_csv(
    db: &DatabaseConnection,
    owner: &user::Model,
) -> Result<Vec<u8>, AppError> {
    let entries = library_entry::Entity::find()
        .filter(library_entry::Column::UserId.eq(owner.id))
        .find_also_related(game::Entity)
        .order_by_asc(library_entry::Column::DateAdded)
        .order_by_asc(library_entry::Column::Id)
        .all(db)
        .await?;

    let developer_ids: BTreeSet<Uuid> = entries
        .iter()
        .filter_map(|(_, game)| game.as_ref().and_then(|g| g.developer_id))
        .collect();
    let developers: HashMap<Uuid, String> = if developer_ids.is_empty() {
        HashMap::new()
    } else {
        developer::Entity::find()
            .filter(developer::Column::Id.is_in(developer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect()
    };

    let rows: Vec<ExportRow> = entries
        .into_iter()
        .filter_map(|(entry, game)| {
            let game = game?;
            Some(ExportRow {
                developer_name: game.developer_id.and_then(|id| developers.get(&id).cloned()),
                game_title: game.title,
                hours_played: entry.hours_played,
                is_favorite: entry.is_favorite,
                date_added: entry.date_added,
            })
        })
        .collect();

    tracing::debug!(user_id = %owner.id, rows = rows.len(), "library exported");
    Ok(write_csv(&rows)?)
}

/// Serialize rows under the fixed export header.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn write_csv(rows: &[ExportRow]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for row in rows {
        writer.write_record([
            row.game_title.as_str(),
            row.developer_name.as_deref().unwrap_or("N/A"),
            &format!("{:.2}", row.hours_played),
            if row.is_favorite { "Yes" } else { "No" },
            &row.date_added.format("%Y-%m-%d").to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {e}"))
}
