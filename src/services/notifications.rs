use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{NotificationKind, notification, user};
use crate::error::AppError;
use crate::services::{Page, Pagination};

/// Append-only notification log.
pub struct NotificationService;

impl NotificationService {
    /// Append a notification for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns the database error if the insert fails.
    pub async fn notify<C>(
        conn: &C,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<notification::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            kind: Set(kind.as_str().to_string()),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            link: Set(None),
            is_read: Set(false),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(conn)
        .await
    }

    /// Like [`Self::notify`], but a failure is only logged. Used after the
    /// triggering action has already committed.
    pub async fn notify_best_effort<C>(
        conn: &C,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) where
        C: ConnectionTrait,
    {
        if let Err(err) = Self::notify(conn, user_id, kind, title, message).await {
            tracing::warn!(%user_id, kind = %kind, error = %err, "failed to record notification");
        }
    }

    /// A user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn list(
        db: &DatabaseConnection,
        owner: &user::Model,
        pagination: Pagination,
    ) -> Result<Page<notification::Model>, AppError> {
        let query = notification::Entity::find().filter(notification::Column::UserId.eq(owner.id));
        let total = query.clone().count(db).await?;

        let items = query
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .offset(pagination.offset)
            .limit(pagination.limit)
            .all(db)
            .await?;

        Ok(Page {
            items,
            total,
            pagination,
        })
    }

    /// Number of unread notifications for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query fails.
    pub async fn unread_count(
        db: &DatabaseConnection,
        owner: &user::Model,
    ) -> Result<u64, AppError> {
        Ok(notification::Entity::find()
            .filter(notification::Column::UserId.eq(owner.id))
            .filter(notification::Column::IsRead.eq(false))
            .count(db)
            .await?)
    }

    /// Flag one of the owner's notifications as read. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the notification does not exist or
    /// belongs to someone else.
    pub async fn mark_read(
        db: &DatabaseConnection,
        owner: &user::Model,
        notification_id: Uuid,
    ) -> Result<notification::Model, AppError> {
        let found = notification::Entity::find_by_id(notification_id)
            .filter(notification::Column::UserId.eq(owner.id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if found.is_read {
            return Ok(found);
        }

        let mut active: notification::ActiveModel = found.into();
        active.is_read = Set(true);
        Ok(active.update(db).await?)
    }
}
