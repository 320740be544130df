//! Derived rating fields of a game.
//!
//! `game.rating` is the arithmetic mean of the game's review ratings (0 when
//! it has none) and `game.total_reviews` their count. Review writes call
//! [`recompute_rating`] on the same transaction before they commit, so the
//! derived fields are never observed out of step with the review table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{game, review};

/// Rating fields as written back to the game row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub rating: f64,
    pub total_reviews: i64,
}

#[derive(Debug, FromQueryResult)]
struct RatingAggregate {
    total: i64,
    rating_sum: Option<i64>,
}

/// Mean of `count` ratings adding up to `sum`; 0 for an empty set.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_rating(sum: i64, count: i64) -> f64 {
    if count <= 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Recompute and persist `rating` / `total_reviews` for `game_id` from its reviews.
///
/// # Errors
///
/// Returns the underlying database error if the aggregate read or the update fails.
pub async fn recompute_rating<C>(conn: &C, game_id: Uuid) -> Result<RatingSummary, DbErr>
where
    C: ConnectionTrait,
{
    let aggregate = review::Entity::find()
        .select_only()
        .column_as(review::Column::Id.count(), "total")
        .column_as(review::Column::Rating.sum(), "rating_sum")
        .filter(review::Column::GameId.eq(game_id))
        .into_model::<RatingAggregate>()
        .one(conn)
        .await?;

    let (sum, total) = aggregate.map_or((0, 0), |a| (a.rating_sum.unwrap_or(0), a.total));
    let summary = RatingSummary {
        rating: mean_rating(sum, total),
        total_reviews: total,
    };

    game::Entity::update_many()
        .col_expr(game::Column::Rating, Expr::value(summary.rating))
        .col_expr(game::Column::TotalReviews, Expr::value(summary.total_reviews))
        .filter(game::Column::Id.eq(game_id))
        .exec(conn)
        .await?;

    tracing::debug!(
        %game_id,
        rating = summary.rating,
        total_reviews = summary.total_reviews,
        "rating recomputed"
    );

    Ok(summary)
}
