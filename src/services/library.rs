use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use uuid::Uuid;

use crate::entities::{NotificationKind, game, library_entry, user};
use crate::error::AppError;
use crate::services::notifications::NotificationService;
use crate::services::{Page, Pagination, icontains, is_unique_violation, split_ordering};

/// Optional initial values for a new library entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryDefaults {
    pub hours_played: Option<f64>,
    pub is_favorite: Option<bool>,
}

/// Partial update of a library entry.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub hours_played: Option<f64>,
    pub is_favorite: Option<bool>,
    pub last_played: Option<DateTime<FixedOffset>>,
}

/// Query options for a user's library.
#[derive(Debug, Clone, Default)]
pub struct LibraryFilter {
    pub favorites_only: bool,
    pub q: Option<String>,
    pub ordering: Option<String>,
    pub pagination: Pagination,
}

/// Result of an add-to-library call.
#[derive(Debug, Clone)]
pub struct LibraryAddition {
    pub entry: library_entry::Model,
    pub already_present: bool,
}

/// A library entry joined with its game.
#[derive(Debug, Clone)]
pub struct LibraryItem {
    pub entry: library_entry::Model,
    pub game: game::Model,
}

#[derive(Debug, Clone, Copy, PartialEq, FromQueryResult)]
pub struct LibraryStats {
    pub total_games: i64,
    pub total_hours: Option<f64>,
}

/// Per-user library ledger.
pub struct LibraryService;

impl LibraryService {
    /// Add `game_id` to `owner`'s library. Calling it again for the same game
    /// returns the existing entry with `already_present` set.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::UnprocessableEntity`] if the initial hours are invalid
    pub async fn add_to_library(
        db: &DatabaseConnection,
        owner: &user::Model,
        game_id: Uuid,
        defaults: EntryDefaults,
    ) -> Result<LibraryAddition, AppError> {
        let target = game::Entity::find_by_id(game_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        if let Some(existing) = find_owned_by_game(db, owner.id, game_id).await? {
            return Ok(LibraryAddition {
                entry: existing,
                already_present: true,
            });
        }

        let hours = defaults.hours_played.unwrap_or(0.0);
        validate_hours(hours)?;

        let (entry, created) = insert_entry(
            db,
            owner.id,
            game_id,
            hours,
            defaults.is_favorite.unwrap_or(false),
        )
        .await?;
        if !created {
            return Ok(LibraryAddition {
                entry,
                already_present: true,
            });
        }

        tracing::info!(
            entry_id = %entry.id,
            %game_id,
            user_id = %owner.id,
            "game added to library"
        );

        NotificationService::notify_best_effort(
            db,
            owner.id,
            NotificationKind::Game,
            "Game added to library",
            &format!("\"{}\" was added to your library.", target.title),
        )
        .await;

        Ok(LibraryAddition {
            entry,
            already_present: false,
        })
    }

    /// Remove `game_id` from `owner`'s library. Returns whether an entry was
    /// removed; an absent entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the delete fails.
    pub async fn remove_from_library(
        db: &DatabaseConnection,
        owner: &user::Model,
        game_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = library_entry::Entity::delete_many()
            .filter(library_entry::Column::UserId.eq(owner.id))
            .filter(library_entry::Column::GameId.eq(game_id))
            .exec(db)
            .await?;

        let removed = result.rows_affected > 0;
        if removed {
            tracing::info!(%game_id, user_id = %owner.id, "game removed from library");
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the entry does not exist
    /// - [`AppError::Forbidden`] if it belongs to another user
    pub async fn get_entry(
        db: &DatabaseConnection,
        owner: &user::Model,
        entry_id: Uuid,
    ) -> Result<LibraryItem, AppError> {
        let (entry, game) = library_entry::Entity::find_by_id(entry_id)
            .find_also_related(game::Entity)
            .one(db)
            .await?
            .ok_or_else(entry_not_found)?;
        ensure_owner(&entry, owner)?;

        let game = game.ok_or_else(entry_not_found)?;
        Ok(LibraryItem { entry, game })
    }

    /// Edit playtime, favorite flag or last-played time of an owned entry.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the entry does not exist
    /// - [`AppError::Forbidden`] if it belongs to another user
    /// - [`AppError::UnprocessableEntity`] if `hours_played` is negative or not finite
    pub async fn update_entry(
        db: &DatabaseConnection,
        owner: &user::Model,
        entry_id: Uuid,
        changes: EntryChanges,
    ) -> Result<library_entry::Model, AppError> {
        let existing = find_entry(db, entry_id).await?;
        ensure_owner(&existing, owner)?;

        let mut active: library_entry::ActiveModel = existing.into();
        if let Some(hours) = changes.hours_played {
            validate_hours(hours)?;
            active.hours_played = Set(hours);
        }
        if let Some(favorite) = changes.is_favorite {
            active.is_favorite = Set(favorite);
        }
        if let Some(last_played) = changes.last_played {
            active.last_played = Set(Some(last_played));
        }

        Ok(active.update(db).await?)
    }

    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the entry does not exist
    /// - [`AppError::Forbidden`] if it belongs to another user
    pub async fn delete_entry(
        db: &DatabaseConnection,
        owner: &user::Model,
        entry_id: Uuid,
    ) -> Result<(), AppError> {
        let existing = find_entry(db, entry_id).await?;
        ensure_owner(&existing, owner)?;
        existing.delete(db).await?;
        tracing::info!(%entry_id, user_id = %owner.id, "library entry deleted");
        Ok(())
    }

    /// Whether `game_id` is in `user_id`'s library.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn contains(
        db: &DatabaseConnection,
        user_id: Uuid,
        game_id: Uuid,
    ) -> Result<bool, AppError> {
        Ok(find_owned_by_game(db, user_id, game_id).await?.is_some())
    }

    /// List `owner`'s entries with their games.
    ///
    /// Ordering accepts `game_title`, `hours_played`, `date_added` and
    /// `last_played`, optionally prefixed with `-`; anything else falls back
    /// to newest additions first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn list_entries(
        db: &DatabaseConnection,
        owner: &user::Model,
        filter: LibraryFilter,
    ) -> Result<Page<LibraryItem>, AppError> {
        let mut query =
            library_entry::Entity::find().filter(library_entry::Column::UserId.eq(owner.id));

        if filter.favorites_only {
            query = query.filter(library_entry::Column::IsFavorite.eq(true));
        }

        if let Some(term) = filter.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let matching_games = game::Entity::find()
                .select_only()
                .column(game::Column::Id)
                .filter(
                    Condition::any()
                        .add(icontains(game::Column::Title, term))
                        .add(icontains(game::Column::Description, term)),
                )
                .into_query();
            query = query.filter(library_entry::Column::GameId.in_subquery(matching_games));
        }

        let total = query.clone().count(db).await?;

        let (field, order) = split_ordering(filter.ordering.as_deref().unwrap_or("-date_added"));
        let joined = query.find_also_related(game::Entity);
        let joined = match field {
            "game_title" => joined.order_by(game::Column::Title, order),
            "hours_played" => joined.order_by(library_entry::Column::HoursPlayed, order),
            "last_played" => joined.order_by(library_entry::Column::LastPlayed, order),
            "date_added" => joined.order_by(library_entry::Column::DateAdded, order),
            _ => joined.order_by(library_entry::Column::DateAdded, Order::Desc),
        };

        let items = joined
            .order_by_asc(library_entry::Column::Id)
            .offset(filter.pagination.offset)
            .limit(filter.pagination.limit)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(entry, game)| game.map(|game| LibraryItem { entry, game }))
            .collect();

        Ok(Page {
            items,
            total,
            pagination: filter.pagination,
        })
    }

    /// Entry count and summed playtime for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn stats(db: &DatabaseConnection, user_id: Uuid) -> Result<LibraryStats, AppError> {
        let stats = library_entry::Entity::find()
            .select_only()
            .column_as(library_entry::Column::Id.count(), "total_games")
            .column_as(library_entry::Column::HoursPlayed.sum(), "total_hours")
            .filter(library_entry::Column::UserId.eq(user_id))
            .into_model::<LibraryStats>()
            .one(db)
            .await?;

        Ok(stats.unwrap_or(LibraryStats {
            total_games: 0,
            total_hours: None,
        }))
    }
}

impl LibraryStats {
    #[must_use]
    pub fn hours(&self) -> f64 {
        self.total_hours.unwrap_or(0.0)
    }
}

fn validate_hours(hours: f64) -> Result<(), AppError> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(())
    } else {
        Err(AppError::UnprocessableEntity(
            "Hours played must be a non-negative number.".to_string(),
        ))
    }
}

fn ensure_owner(entry: &library_entry::Model, owner: &user::Model) -> Result<(), AppError> {
    if entry.user_id == owner.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only manage your own library.".to_string(),
        ))
    }
}

fn entry_not_found() -> AppError {
    AppError::NotFound("Library entry not found".to_string())
}

async fn find_entry(
    db: &DatabaseConnection,
    entry_id: Uuid,
) -> Result<library_entry::Model, AppError> {
    library_entry::Entity::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(entry_not_found)
}

/// Insert a fresh entry. A unique violation means a concurrent add for the
/// same pair won; that row is returned with `false`.
async fn insert_entry(
    db: &DatabaseConnection,
    user_id: Uuid,
    game_id: Uuid,
    hours_played: f64,
    is_favorite: bool,
) -> Result<(library_entry::Model, bool), AppError> {
    let inserted = library_entry::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        game_id: Set(game_id),
        date_added: Set(Utc::now().fixed_offset()),
        hours_played: Set(hours_played),
        is_favorite: Set(is_favorite),
        last_played: Set(None),
    }
    .insert(db)
    .await;

    match inserted {
        Ok(entry) => Ok((entry, true)),
        Err(err) if is_unique_violation(&err) => {
            let existing = find_owned_by_game(db, user_id, game_id)
                .await?
                .ok_or_else(|| AppError::Internal(err.into()))?;
            Ok((existing, false))
        }
        Err(err) => Err(err.into()),
    }
}

async fn find_owned_by_game(
    db: &DatabaseConnection,
    user_id: Uuid,
    game_id: Uuid,
) -> Result<Option<library_entry::Model>, sea_orm::DbErr> {
    library_entry::Entity::find()
        .filter(library_entry::Column::UserId.eq(user_id))
        .filter(library_entry::Column::GameId.eq(game_id))
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    #[test]
    fn hours_must_be_finite_and_non_negative() {
        assert!(validate_hours(0.0).is_ok());
        assert!(validate_hours(12.5).is_ok());
        assert!(validate_hours(-1.0).is_err());
        assert!(validate_hours(f64::NAN).is_err());
        assert!(validate_hours(f64::INFINITY).is_err());
    }

    #[tokio::test]
    async fn insert_race_returns_the_existing_entry() {
        let db = test_support::memory_db().await;
        let owner = test_support::seed_user(&db, "racer").await;
        let target = test_support::seed_game(&db, "Contested").await;

        let first = insert_entry(&db, owner.id, target.id, 3.0, true).await;
        assert!(first.as_ref().is_ok_and(|(_, created)| *created));

        // Skips the up-front lookup, so only the unique index catches it.
        let second = insert_entry(&db, owner.id, target.id, 0.0, false).await;
        assert!(second.as_ref().is_ok_and(|(entry, created)| {
            !created && entry.is_favorite && (entry.hours_played - 3.0).abs() < f64::EPSILON
        }));
        assert_eq!(
            first.map(|(e, _)| e.id).ok(),
            second.map(|(e, _)| e.id).ok()
        );
    }

    #[test]
    fn empty_stats_report_zero_hours() {
        let stats = LibraryStats {
            total_games: 0,
            total_hours: None,
        };
        assert!(stats.hours().abs() < f64::EPSILON);
    }
}
