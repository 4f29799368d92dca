use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::notifications;
use crate::models::notification::{NewNotification, Notification};

pub struct NotificationRepository {
    conn: DatabaseConnection,
}

impl NotificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, input: NewNotification) -> Result<Notification> {
        let active = notifications::ActiveModel {
            user_id: Set(input.user_id),
            kind: Set(input.kind),
            title: Set(input.title),
            body: Set(input.body),
            link: Set(input.link),
            related_id: Set(input.related_id),
            related_type: Set(input.related_type),
            read_at: Set(None),
            created_at: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let row = active
            .insert(&self.conn)
            .await
            .context("Failed to insert notification")?;

        map_row(row)
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut query =
            notifications::Entity::find().filter(notifications::Column::UserId.eq(user_id));

        if unread_only {
            query = query.filter(notifications::Column::ReadAt.is_null());
        }

        let rows = query
            .order_by_desc(notifications::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query notifications")?;

        rows.into_iter().map(map_row).collect()
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::ReadAt.is_null())
            .count(&self.conn)
            .await
            .context("Failed to count unread notifications")
    }

    /// Mark one notification as read. Returns false when it does not exist,
    /// belongs to another user, or was already read.
    pub async fn mark_read(&self, id: i32, user_id: i32) -> Result<bool> {
        let result = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::ReadAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(notifications::Column::Id.eq(id))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::ReadAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to mark notification read")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::ReadAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::ReadAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to mark notifications read")?;

        Ok(result.rows_affected)
    }
}

fn map_row(row: notifications::Model) -> Result<Notification> {
    let parse = |raw: &str| -> Result<DateTime<Utc>> {
        raw.parse::<DateTime<Utc>>()
            .with_context(|| format!("Invalid notification timestamp {raw}"))
    };

    Ok(Notification {
        created_at: parse(&row.created_at)?,
        read_at: row.read_at.as_deref().map(parse).transpose()?,
        id: row.id,
        user_id: row.user_id,
        kind: row.kind,
        title: row.title,
        body: row.body,
        link: row.link,
        related_id: row.related_id,
        related_type: row.related_type,
    })
}
