//! Domain operations over the catalog, library, review and notification
//! tables.
//!
//! Every operation takes its database handle and, where relevant, the acting
//! user explicitly. Handlers in `routes` are thin wrappers around these.

pub mod catalog;
pub mod export;
pub mod library;
pub mod notifications;
pub mod rating;
pub mod reviews;

#[cfg(test)]
pub(crate) mod test_support;

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{DbErr, IntoSimpleExpr, Order, SqlErr};

use crate::entities::user;
use crate::error::AppError;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u64 = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Offset/limit window applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Build a window, defaulting and clamping the limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(offset: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

/// Split an ordering parameter such as `-rating` into its field and direction.
#[must_use]
pub fn split_ordering(raw: &str) -> (&str, Order) {
    let raw = raw.trim();
    raw.strip_prefix('-')
        .map_or((raw, Order::Asc), |field| (field, Order::Desc))
}

/// Case-insensitive `LIKE '%term%'` over `column`, with `%`, `_` and `\`
/// in the term matched literally.
pub fn icontains(column: impl IntoSimpleExpr, term: &str) -> SimpleExpr {
    let escaped: String = term
        .to_lowercase()
        .chars()
        .flat_map(|c| match c {
            '%' | '_' | '\\' => vec!['\\', c],
            other => vec![other],
        })
        .collect();
    Expr::expr(Func::lower(column.into_simple_expr()))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

/// Reject actors without the staff flag.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for non-staff users.
pub fn require_staff(actor: &user::Model) -> Result<(), AppError> {
    if actor.is_staff {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only staff can manage the catalog.".to_string(),
        ))
    }
}

/// Whether a database error is a unique-constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().limit, DEFAULT_LIMIT);
        assert_eq!(Pagination::new(Some(5), Some(1000)).limit, MAX_LIMIT);
        assert_eq!(Pagination::new(None, Some(0)).limit, 1);
        assert_eq!(Pagination::new(Some(40), None).offset, 40);
    }

    #[test]
    fn ordering_prefix_means_descending() {
        assert!(matches!(split_ordering("-rating"), ("rating", Order::Desc)));
        assert!(matches!(split_ordering("title"), ("title", Order::Asc)));
        assert!(matches!(split_ordering(" -title "), ("title", Order::Desc)));
    }

    #[test]
    fn staff_gate() {
        let now = chrono::Utc::now().fixed_offset();
        let mut actor = user::Model {
            id: uuid::Uuid::new_v4(),
            username: "player".to_string(),
            email: "player@example.com".to_string(),
            password_hash: String::new(),
            bio: String::new(),
            steam_profile: None,
            is_staff: false,
            is_premium: false,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(require_staff(&actor), Err(AppError::Forbidden(_))));
        actor.is_staff = true;
        assert!(require_staff(&actor).is_ok());
    }
}
