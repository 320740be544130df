//! Staff-managed catalog: games, developers and categories.
//!
//! Reads are public. Every mutation takes the acting user and rejects
//! non-staff actors with [`AppError::Forbidden`] before touching the
//! database.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, RelationTrait, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{category, developer, game, game_category, library_entry, review, user};
use crate::error::AppError;
use crate::services::{
    Page, Pagination, icontains, is_unique_violation, require_staff, split_ordering,
};

/// Size of each home page listing.
pub const HOME_LISTING_SIZE: u64 = 6;

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub release_date: NaiveDate,
    pub cover_image_url: Option<String>,
    pub steam_url: Option<String>,
    pub developer_id: Option<Uuid>,
    pub category_ids: Vec<Uuid>,
}

/// Partial game update. `developer_id: Some(None)` clears the developer;
/// `category_ids: Some(..)` replaces the whole category set.
#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub release_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub steam_url: Option<String>,
    pub developer_id: Option<Option<Uuid>>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub q: Option<String>,
    pub category: Option<Uuid>,
    pub developer: Option<Uuid>,
    pub min_rating: Option<f64>,
    pub ordering: Option<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
pub struct NewDeveloper {
    pub name: String,
    pub country: String,
    pub website: Option<String>,
    pub description: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeveloperChanges {
    pub name: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

// ============================================================================
// Outputs
// ============================================================================

/// A game with its developer and categories loaded.
#[derive(Debug, Clone)]
pub struct GameDetails {
    pub game: game::Model,
    pub developer: Option<developer::Model>,
    pub categories: Vec<category::Model>,
}

/// The three home page listings.
#[derive(Debug, Clone)]
pub struct HomeListings {
    pub featured: Vec<GameDetails>,
    pub recent: Vec<GameDetails>,
    pub popular: Vec<GameDetails>,
}

/// Developer row plus the number of catalog games it has.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct DeveloperSummary {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub website: Option<String>,
    pub description: String,
    pub logo_url: Option<String>,
    pub game_count: i64,
}

#[derive(Debug, Clone)]
pub struct DeveloperDetails {
    pub developer: developer::Model,
    pub games: Vec<game::Model>,
}

pub struct CatalogService;

// ============================================================================
// Games
// ============================================================================

impl CatalogService {
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::UnprocessableEntity`] for a blank title, negative price or
    ///   unknown developer/category references
    pub async fn create_game(
        db: &DatabaseConnection,
        actor: &user::Model,
        input: NewGame,
    ) -> Result<GameDetails, AppError> {
        require_staff(actor)?;
        let title = required_text(&input.title, "Title")?;
        validate_price(input.price_cents)?;

        let txn = db.begin().await?;

        if let Some(developer_id) = input.developer_id {
            ensure_developer_exists(&txn, developer_id).await?;
        }
        let category_ids = resolve_categories(&txn, &input.category_ids).await?;

        let now = Utc::now().fixed_offset();
        let created = game::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(input.description.trim().to_string()),
            release_date: Set(input.release_date),
            price_cents: Set(input.price_cents),
            cover_image_url: Set(input.cover_image_url),
            steam_url: Set(input.steam_url),
            developer_id: Set(input.developer_id),
            rating: Set(0.0),
            total_reviews: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        replace_categories(&txn, created.id, &category_ids).await?;
        txn.commit().await?;

        tracing::info!(game_id = %created.id, title = %created.title, "game created");
        Self::get_game(db, created.id).await
    }

    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::UnprocessableEntity`] for invalid field values
    pub async fn update_game(
        db: &DatabaseConnection,
        actor: &user::Model,
        game_id: Uuid,
        changes: GameChanges,
    ) -> Result<GameDetails, AppError> {
        require_staff(actor)?;

        let txn = db.begin().await?;
        let existing = find_game(&txn, game_id).await?;
        let mut active: game::ActiveModel = existing.into();

        if let Some(title) = changes.title {
            active.title = Set(required_text(&title, "Title")?);
        }
        if let Some(description) = changes.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(price) = changes.price_cents {
            validate_price(price)?;
            active.price_cents = Set(price);
        }
        if let Some(release_date) = changes.release_date {
            active.release_date = Set(release_date);
        }
        if let Some(url) = changes.cover_image_url {
            active.cover_image_url = Set(non_blank(url));
        }
        if let Some(url) = changes.steam_url {
            active.steam_url = Set(non_blank(url));
        }
        if let Some(developer_id) = changes.developer_id {
            if let Some(id) = developer_id {
                ensure_developer_exists(&txn, id).await?;
            }
            active.developer_id = Set(developer_id);
        }
        if let Some(ids) = changes.category_ids {
            let category_ids = resolve_categories(&txn, &ids).await?;
            replace_categories(&txn, game_id, &category_ids).await?;
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(%game_id, "game updated");
        Self::get_game(db, game_id).await
    }

    /// Delete a game along with its reviews, library entries and category links.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::NotFound`] if the game does not exist
    pub async fn delete_game(
        db: &DatabaseConnection,
        actor: &user::Model,
        game_id: Uuid,
    ) -> Result<(), AppError> {
        require_staff(actor)?;

        let txn = db.begin().await?;
        let existing = find_game(&txn, game_id).await?;

        let reviews = review::Entity::delete_many()
            .filter(review::Column::GameId.eq(game_id))
            .exec(&txn)
            .await?;
        let entries = library_entry::Entity::delete_many()
            .filter(library_entry::Column::GameId.eq(game_id))
            .exec(&txn)
            .await?;
        game_category::Entity::delete_many()
            .filter(game_category::Column::GameId.eq(game_id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            %game_id,
            reviews_removed = reviews.rows_affected,
            entries_removed = entries.rows_affected,
            "game deleted"
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the game does not exist.
    pub async fn get_game(db: &DatabaseConnection, game_id: Uuid) -> Result<GameDetails, AppError> {
        let found = find_game(db, game_id).await?;
        let mut details = hydrate(db, vec![found]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))
    }

    /// Search, filter and order the catalog.
    ///
    /// `q` matches title, description and developer name case-insensitively.
    /// Ordering accepts `title`, `release_date` and `rating`, optionally
    /// prefixed with `-`; anything else falls back to newest releases first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn list_games(
        db: &DatabaseConnection,
        filter: GameFilter,
    ) -> Result<Page<GameDetails>, AppError> {
        let mut query = game::Entity::find();

        if let Some(term) = filter.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let matching_developers = developer::Entity::find()
                .select_only()
                .column(developer::Column::Id)
                .filter(icontains(developer::Column::Name, term))
                .into_query();
            query = query.filter(
                Condition::any()
                    .add(icontains(game::Column::Title, term))
                    .add(icontains(game::Column::Description, term))
                    .add(game::Column::DeveloperId.in_subquery(matching_developers)),
            );
        }
        if let Some(category_id) = filter.category {
            let in_category = game_category::Entity::find()
                .select_only()
                .column(game_category::Column::GameId)
                .filter(game_category::Column::CategoryId.eq(category_id))
                .into_query();
            query = query.filter(game::Column::Id.in_subquery(in_category));
        }
        if let Some(developer_id) = filter.developer {
            query = query.filter(game::Column::DeveloperId.eq(developer_id));
        }
        if let Some(min_rating) = filter.min_rating {
            query = query.filter(game::Column::Rating.gte(min_rating));
        }

        let total = query.clone().count(db).await?;

        let (field, order) =
            split_ordering(filter.ordering.as_deref().unwrap_or("-release_date"));
        let query = match field {
            "title" => query.order_by(game::Column::Title, order),
            "rating" => query.order_by(game::Column::Rating, order),
            "release_date" => query.order_by(game::Column::ReleaseDate, order),
            _ => query.order_by(game::Column::ReleaseDate, Order::Desc),
        };

        let games = query
            .order_by_asc(game::Column::Id)
            .offset(filter.pagination.offset)
            .limit(filter.pagination.limit)
            .all(db)
            .await?;

        Ok(Page {
            items: hydrate(db, games).await?,
            total,
            pagination: filter.pagination,
        })
    }

    /// Top-rated, newest and most-reviewed games.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a query fails.
    pub async fn home(db: &DatabaseConnection) -> Result<HomeListings, AppError> {
        let featured = game::Entity::find()
            .order_by_desc(game::Column::Rating)
            .order_by_desc(game::Column::TotalReviews)
            .limit(HOME_LISTING_SIZE)
            .all(db)
            .await?;
        let recent = game::Entity::find()
            .order_by_desc(game::Column::ReleaseDate)
            .order_by_desc(game::Column::CreatedAt)
            .limit(HOME_LISTING_SIZE)
            .all(db)
            .await?;
        let popular = game::Entity::find()
            .order_by_desc(game::Column::TotalReviews)
            .order_by_desc(game::Column::Rating)
            .limit(HOME_LISTING_SIZE)
            .all(db)
            .await?;

        Ok(HomeListings {
            featured: hydrate(db, featured).await?,
            recent: hydrate(db, recent).await?,
            popular: hydrate(db, popular).await?,
        })
    }
}

// ============================================================================
// Developers
// ============================================================================

impl CatalogService {
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::UnprocessableEntity`] for a blank name
    pub async fn create_developer(
        db: &DatabaseConnection,
        actor: &user::Model,
        input: NewDeveloper,
    ) -> Result<developer::Model, AppError> {
        require_staff(actor)?;

        let created = developer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(required_text(&input.name, "Name")?),
            country: Set(input.country.trim().to_string()),
            website: Set(input.website.and_then(non_blank)),
            description: Set(input.description.trim().to_string()),
            logo_url: Set(input.logo_url.and_then(non_blank)),
        }
        .insert(db)
        .await?;

        tracing::info!(developer_id = %created.id, name = %created.name, "developer created");
        Ok(created)
    }

    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::NotFound`] if the developer does not exist
    /// - [`AppError::UnprocessableEntity`] for a blank name
    pub async fn update_developer(
        db: &DatabaseConnection,
        actor: &user::Model,
        developer_id: Uuid,
        changes: DeveloperChanges,
    ) -> Result<developer::Model, AppError> {
        require_staff(actor)?;

        let existing = find_developer(db, developer_id).await?;
        let mut active: developer::ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(required_text(&name, "Name")?);
        }
        if let Some(country) = changes.country {
            active.country = Set(country.trim().to_string());
        }
        if let Some(website) = changes.website {
            active.website = Set(non_blank(website));
        }
        if let Some(description) = changes.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(logo_url) = changes.logo_url {
            active.logo_url = Set(non_blank(logo_url));
        }

        Ok(active.update(db).await?)
    }

    /// Delete a developer. Its games stay in the catalog without a developer.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::NotFound`] if the developer does not exist
    pub async fn delete_developer(
        db: &DatabaseConnection,
        actor: &user::Model,
        developer_id: Uuid,
    ) -> Result<(), AppError> {
        require_staff(actor)?;

        let txn = db.begin().await?;
        let existing = find_developer(&txn, developer_id).await?;

        let orphaned = game::Entity::update_many()
            .col_expr(game::Column::DeveloperId, Expr::value(Option::<Uuid>::None))
            .filter(game::Column::DeveloperId.eq(developer_id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            %developer_id,
            games_detached = orphaned.rows_affected,
            "developer deleted"
        );
        Ok(())
    }

    /// Developers with their game counts, most prolific first. `q` matches
    /// name and country.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn list_developers(
        db: &DatabaseConnection,
        q: Option<&str>,
        pagination: Pagination,
    ) -> Result<Page<DeveloperSummary>, AppError> {
        let search = q.map(str::trim).filter(|t| !t.is_empty()).map(|term| {
            Condition::any()
                .add(icontains(developer::Column::Name, term))
                .add(icontains(developer::Column::Country, term))
        });

        let mut count_query = developer::Entity::find();
        if let Some(condition) = search.clone() {
            count_query = count_query.filter(condition);
        }
        let total = count_query.count(db).await?;

        let mut query = developer::Entity::find()
            .select_only()
            .columns([
                developer::Column::Id,
                developer::Column::Name,
                developer::Column::Country,
                developer::Column::Website,
                developer::Column::Description,
                developer::Column::LogoUrl,
            ])
            .column_as(game::Column::Id.count(), "game_count")
            .join(JoinType::LeftJoin, developer::Relation::Games.def())
            .group_by(developer::Column::Id);
        if let Some(condition) = search {
            query = query.filter(condition);
        }

        let items = query
            .order_by(Expr::cust("game_count"), Order::Desc)
            .order_by_asc(developer::Column::Name)
            .offset(pagination.offset)
            .limit(pagination.limit)
            .into_model::<DeveloperSummary>()
            .all(db)
            .await?;

        Ok(Page {
            items,
            total,
            pagination,
        })
    }

    /// A developer and its games, newest release first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the developer does not exist.
    pub async fn get_developer(
        db: &DatabaseConnection,
        developer_id: Uuid,
    ) -> Result<DeveloperDetails, AppError> {
        let developer = find_developer(db, developer_id).await?;
        let games = developer
            .find_related(game::Entity)
            .order_by_desc(game::Column::ReleaseDate)
            .all(db)
            .await?;
        Ok(DeveloperDetails { developer, games })
    }
}

// ============================================================================
// Categories
// ============================================================================

impl CatalogService {
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::UnprocessableEntity`] for a blank name
    /// - [`AppError::Conflict`] if the name is taken
    pub async fn create_category(
        db: &DatabaseConnection,
        actor: &user::Model,
        input: NewCategory,
    ) -> Result<category::Model, AppError> {
        require_staff(actor)?;
        let name = required_text(&input.name, "Name")?;
        ensure_category_name_free(db, &name, None).await?;

        let created = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(input.description.trim().to_string()),
            icon: Set(input.icon.trim().to_string()),
        }
        .insert(db)
        .await
        .map_err(category_write_error)?;

        tracing::info!(category_id = %created.id, name = %created.name, "category created");
        Ok(created)
    }

    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::NotFound`] if the category does not exist
    /// - [`AppError::Conflict`] if the new name is taken
    pub async fn update_category(
        db: &DatabaseConnection,
        actor: &user::Model,
        category_id: Uuid,
        changes: CategoryChanges,
    ) -> Result<category::Model, AppError> {
        require_staff(actor)?;

        let existing = category::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        let mut active: category::ActiveModel = existing.into();

        if let Some(name) = changes.name {
            let name = required_text(&name, "Name")?;
            ensure_category_name_free(db, &name, Some(category_id)).await?;
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(icon) = changes.icon {
            active.icon = Set(icon.trim().to_string());
        }

        active.update(db).await.map_err(category_write_error)
    }

    /// Delete a category and unlink it from its games.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] for non-staff actors
    /// - [`AppError::NotFound`] if the category does not exist
    pub async fn delete_category(
        db: &DatabaseConnection,
        actor: &user::Model,
        category_id: Uuid,
    ) -> Result<(), AppError> {
        require_staff(actor)?;

        let txn = db.begin().await?;
        let existing = category::Entity::find_by_id(category_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        game_category::Entity::delete_many()
            .filter(game_category::Column::CategoryId.eq(category_id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(%category_id, "category deleted");
        Ok(())
    }

    /// All categories by name, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn list_categories(
        db: &DatabaseConnection,
        q: Option<&str>,
    ) -> Result<Vec<category::Model>, AppError> {
        let mut query = category::Entity::find();
        if let Some(term) = q.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(icontains(category::Column::Name, term));
        }
        Ok(query.order_by_asc(category::Column::Name).all(db).await?)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Load developers and categories for `games`, preserving order.
async fn hydrate(
    db: &DatabaseConnection,
    games: Vec<game::Model>,
) -> Result<Vec<GameDetails>, AppError> {
    if games.is_empty() {
        return Ok(Vec::new());
    }

    let developer_ids: BTreeSet<Uuid> = games.iter().filter_map(|g| g.developer_id).collect();
    let developers: HashMap<Uuid, developer::Model> = if developer_ids.is_empty() {
        HashMap::new()
    } else {
        developer::Entity::find()
            .filter(developer::Column::Id.is_in(developer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect()
    };

    let game_ids: Vec<Uuid> = games.iter().map(|g| g.id).collect();
    let links = game_category::Entity::find()
        .filter(game_category::Column::GameId.is_in(game_ids))
        .all(db)
        .await?;

    let category_ids: BTreeSet<Uuid> = links.iter().map(|l| l.category_id).collect();
    let categories: HashMap<Uuid, category::Model> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let mut by_game: HashMap<Uuid, Vec<category::Model>> = HashMap::new();
    for link in links {
        if let Some(found) = categories.get(&link.category_id) {
            by_game.entry(link.game_id).or_default().push(found.clone());
        }
    }

    Ok(games
        .into_iter()
        .map(|game| {
            let developer = game.developer_id.and_then(|id| developers.get(&id).cloned());
            let mut categories = by_game.remove(&game.id).unwrap_or_default();
            categories.sort_by(|a, b| a.name.cmp(&b.name));
            GameDetails {
                game,
                developer,
                categories,
            }
        })
        .collect())
}

async fn find_game<C: ConnectionTrait>(conn: &C, game_id: Uuid) -> Result<game::Model, AppError> {
    game::Entity::find_by_id(game_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))
}

async fn find_developer<C: ConnectionTrait>(
    conn: &C,
    developer_id: Uuid,
) -> Result<developer::Model, AppError> {
    developer::Entity::find_by_id(developer_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Developer not found".to_string()))
}

async fn ensure_developer_exists<C: ConnectionTrait>(
    conn: &C,
    developer_id: Uuid,
) -> Result<(), AppError> {
    let found = developer::Entity::find_by_id(developer_id).one(conn).await?;
    if found.is_none() {
        return Err(AppError::UnprocessableEntity(format!(
            "Developer {developer_id} does not exist."
        )));
    }
    Ok(())
}

/// Deduplicate `ids` and check every category exists.
async fn resolve_categories<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, AppError> {
    let unique: Vec<Uuid> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    if unique.is_empty() {
        return Ok(unique);
    }

    let found = category::Entity::find()
        .filter(category::Column::Id.is_in(unique.clone()))
        .count(conn)
        .await?;
    if usize::try_from(found).ok() != Some(unique.len()) {
        return Err(AppError::UnprocessableEntity(
            "One or more categories do not exist.".to_string(),
        ));
    }
    Ok(unique)
}

async fn replace_categories<C: ConnectionTrait>(
    conn: &C,
    game_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), AppError> {
    game_category::Entity::delete_many()
        .filter(game_category::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;

    if category_ids.is_empty() {
        return Ok(());
    }

    let links = category_ids.iter().map(|&category_id| game_category::ActiveModel {
        game_id: Set(game_id),
        category_id: Set(category_id),
    });
    game_category::Entity::insert_many(links).exec(conn).await?;
    Ok(())
}

async fn ensure_category_name_free(
    db: &DatabaseConnection,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    let mut query = category::Entity::find().filter(category::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(category::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(category_name_taken());
    }
    Ok(())
}

fn category_name_taken() -> AppError {
    AppError::Conflict("A category with this name already exists.".to_string())
}

fn category_write_error(err: sea_orm::DbErr) -> AppError {
    if is_unique_violation(&err) {
        category_name_taken()
    } else {
        err.into()
    }
}

fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::UnprocessableEntity(format!("{field} is required.")));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price_cents: i64) -> Result<(), AppError> {
    if price_cents < 0 {
        return Err(AppError::UnprocessableEntity(
            "Price cannot be negative.".to_string(),
        ));
    }
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
