use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::review::{MAX_RATING, MIN_RATING};
use crate::entities::{NotificationKind, game, review, user};
use crate::error::AppError;
use crate::services::notifications::NotificationService;
use crate::services::rating::recompute_rating;
use crate::services::{Page, Pagination, is_unique_violation, split_ordering};

/// Fields supplied when writing a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: i32,
    pub comment: String,
}

/// Partial update of an existing review.
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Query options for listing reviews.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub game_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub ordering: Option<String>,
    pub pagination: Pagination,
}

/// A review together with the names needed to display it.
#[derive(Debug, Clone)]
pub struct ReviewDetails {
    pub review: review::Model,
    pub username: String,
    pub game_title: String,
}

/// Review ledger: one review per (user, game), each write followed by a
/// rating recompute on the same transaction.
pub struct ReviewService;

impl ReviewService {
    /// Publish `author`'s review of `game_id`.
    ///
    /// # Errors
    ///
    /// - [`AppError::UnprocessableEntity`] if the rating is outside 1-5 or the comment is blank
    /// - [`AppError::NotFound`] if the game does not exist
    /// - [`AppError::Conflict`] if the author already reviewed this game
    pub async fn create_review(
        db: &DatabaseConnection,
        author: &user::Model,
        game_id: Uuid,
        input: NewReview,
    ) -> Result<review::Model, AppError> {
        validate_rating(input.rating)?;
        let comment = validate_comment(&input.comment)?;

        let txn = db.begin().await?;

        let target = find_game(&txn, game_id).await?;

        let existing = review::Entity::find()
            .filter(review::Column::UserId.eq(author.id))
            .filter(review::Column::GameId.eq(game_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(duplicate_review());
        }

        let now = Utc::now().fixed_offset();
        let created = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(author.id),
            game_id: Set(game_id),
            rating: Set(input.rating),
            comment: Set(comment),
            is_helpful: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(insert_error)?;

        let summary = recompute_rating(&txn, game_id).await?;
        txn.commit().await?;

        tracing::info!(
            review_id = %created.id,
            %game_id,
            user_id = %author.id,
            rating = created.rating,
            game_rating = summary.rating,
            "review created"
        );

        NotificationService::notify_best_effort(
            db,
            author.id,
            NotificationKind::Review,
            "Review published",
            &format!("Your review of \"{}\" has been published.", target.title),
        )
        .await;

        Ok(created)
    }

    /// Edit one of `actor`'s own reviews.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the review does not exist
    /// - [`AppError::Forbidden`] if `actor` did not write it
    /// - [`AppError::UnprocessableEntity`] if a new rating or comment is invalid
    pub async fn update_review(
        db: &DatabaseConnection,
        actor: &user::Model,
        review_id: Uuid,
        changes: ReviewChanges,
    ) -> Result<review::Model, AppError> {
        let txn = db.begin().await?;

        let existing = find_review(&txn, review_id).await?;
        ensure_author(&existing, actor, "edit")?;

        let game_id = existing.game_id;
        let mut active: review::ActiveModel = existing.into();

        if let Some(rating) = changes.rating {
            validate_rating(rating)?;
            active.rating = Set(rating);
        }
        if let Some(comment) = changes.comment {
            active.comment = Set(validate_comment(&comment)?);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        let updated = active.update(&txn).await?;
        recompute_rating(&txn, game_id).await?;
        txn.commit().await?;

        tracing::info!(%review_id, %game_id, rating = updated.rating, "review updated");
        Ok(updated)
    }

    /// Delete one of `actor`'s own reviews.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the review does not exist
    /// - [`AppError::Forbidden`] if `actor` did not write it
    pub async fn delete_review(
        db: &DatabaseConnection,
        actor: &user::Model,
        review_id: Uuid,
    ) -> Result<(), AppError> {
        let txn = db.begin().await?;

        let existing = find_review(&txn, review_id).await?;
        ensure_author(&existing, actor, "delete")?;

        let game_id = existing.game_id;
        existing.delete(&txn).await?;
        recompute_rating(&txn, game_id).await?;
        txn.commit().await?;

        tracing::info!(%review_id, %game_id, "review deleted");
        Ok(())
    }

    /// Fetch a single review with display names.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the review does not exist.
    pub async fn get_review(
        db: &DatabaseConnection,
        review_id: Uuid,
    ) -> Result<ReviewDetails, AppError> {
        let found = find_review(db, review_id).await?;
        let mut details = Self::with_details(db, vec![found]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
    }

    /// `user`'s review of `game_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: Uuid,
        game_id: Uuid,
    ) -> Result<Option<review::Model>, AppError> {
        Ok(review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::GameId.eq(game_id))
            .one(db)
            .await?)
    }

    /// Number of reviews written by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn count_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, AppError> {
        Ok(review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .count(db)
            .await?)
    }

    /// List reviews, filtered and ordered by `created_at` or `rating`
    /// (default newest first).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn list_reviews(
        db: &DatabaseConnection,
        filter: ReviewFilter,
    ) -> Result<Page<ReviewDetails>, AppError> {
        let mut query = review::Entity::find();
        if let Some(game_id) = filter.game_id {
            query = query.filter(review::Column::GameId.eq(game_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(review::Column::UserId.eq(user_id));
        }
        if let Some(rating) = filter.rating {
            query = query.filter(review::Column::Rating.eq(rating));
        }

        let total = query.clone().count(db).await?;

        let (field, order) = split_ordering(filter.ordering.as_deref().unwrap_or("-created_at"));
        let query = match field {
            "rating" => query
                .order_by(review::Column::Rating, order)
                .order_by_desc(review::Column::CreatedAt),
            _ => query.order_by(
                review::Column::CreatedAt,
                if field == "created_at" { order } else { Order::Desc },
            ),
        };

        let reviews = query
            .offset(filter.pagination.offset)
            .limit(filter.pagination.limit)
            .all(db)
            .await?;

        Ok(Page {
            items: Self::with_details(db, reviews).await?,
            total,
            pagination: filter.pagination,
        })
    }

    /// Attach author usernames and game titles, preserving order.
    async fn with_details(
        db: &DatabaseConnection,
        reviews: Vec<review::Model>,
    ) -> Result<Vec<ReviewDetails>, AppError> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
        let game_ids: Vec<Uuid> = reviews.iter().map(|r| r.game_id).collect();

        let usernames: HashMap<Uuid, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let titles: HashMap<Uuid, String> = game::Entity::find()
            .filter(game::Column::Id.is_in(game_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|g| (g.id, g.title))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| ReviewDetails {
                username: usernames.get(&review.user_id).cloned().unwrap_or_default(),
                game_title: titles.get(&review.game_id).cloned().unwrap_or_default(),
                review,
            })
            .collect())
    }
}

/// Reject ratings outside `MIN_RATING..=MAX_RATING`.
///
/// # Errors
///
/// Returns [`AppError::UnprocessableEntity`] for out-of-range values.
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::UnprocessableEntity(format!(
            "Rating must be an integer between {MIN_RATING} and {MAX_RATING}."
        )))
    }
}

fn validate_comment(comment: &str) -> Result<String, AppError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Comment is required.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn duplicate_review() -> AppError {
    AppError::Conflict("You have already reviewed this game.".to_string())
}

/// The unique `(user_id, game_id)` index backs up the up-front duplicate check.
fn insert_error(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        duplicate_review()
    } else {
        err.into()
    }
}

fn ensure_author(review: &review::Model, actor: &user::Model, action: &str) -> Result<(), AppError> {
    if review.user_id == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You can only {action} your own reviews."
        )))
    }
}

async fn find_game<C: ConnectionTrait>(conn: &C, game_id: Uuid) -> Result<game::Model, AppError> {
    game::Entity::find_by_id(game_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))
}

async fn find_review<C: ConnectionTrait>(
    conn: &C,
    review_id: Uuid,
) -> Result<review::Model, AppError> {
    review::Entity::find_by_id(review_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    fn row(author: Uuid, game_id: Uuid, rating: i32) -> review::ActiveModel {
        let now = Utc::now().fixed_offset();
        review::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(author),
            game_id: Set(game_id),
            rating: Set(rating),
            comment: Set("Fine".to_string()),
            is_helpful: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    #[tokio::test]
    async fn unique_index_violation_maps_to_conflict() {
        let db = test_support::memory_db().await;
        let author = test_support::seed_user(&db, "author").await;
        let target = test_support::seed_game(&db, "Twice").await;

        assert!(row(author.id, target.id, 4).insert(&db).await.is_ok());
        let second = row(author.id, target.id, 2).insert(&db).await;

        assert!(second.is_err());
        if let Err(err) = second {
            assert!(matches!(insert_error(err), AppError::Conflict(_)));
        }
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = DbErr::Custom("connection reset".to_string());
        assert!(matches!(insert_error(err), AppError::Internal(_)));
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(matches!(validate_rating(0), Err(AppError::UnprocessableEntity(_))));
        assert!(matches!(validate_rating(6), Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn blank_comment_rejected() {
        assert!(validate_comment("   ").is_err());
        assert_eq!(validate_comment("  Great  ").unwrap_or_default(), "Great");
    }
}
