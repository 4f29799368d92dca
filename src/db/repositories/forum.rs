use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::country::CountryCode;
use crate::entities::{forum_posts, forum_threads};
use crate::models::forum::{ForumPost, ForumThread};

pub struct ForumRepository {
    conn: DatabaseConnection,
}

impl ForumRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Threads for a market, pinned first, newest next. Returns the page
    /// rows and the unpaged total.
    pub async fn list_threads(
        &self,
        country: CountryCode,
        category: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ForumThread>, u64)> {
        let mut query = forum_threads::Entity::find()
            .filter(forum_threads::Column::Country.eq(country.as_str()));

        if let Some(category) = category {
            query = query.filter(forum_threads::Column::Category.eq(category));
        }

        let total = query
            .clone()
            .count(&self.conn)
            .await
            .context("Failed to count forum threads")?;

        let rows = query
            .order_by_desc(forum_threads::Column::IsPinned)
            .order_by_desc(forum_threads::Column::CreatedAt)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query forum threads")?;

        let threads = rows
            .into_iter()
            .map(map_thread)
            .collect::<Result<Vec<_>>>()?;

        Ok((threads, total))
    }

    pub async fn get_thread(
        &self,
        country: CountryCode,
        thread_id: &str,
    ) -> Result<Option<ForumThread>> {
        let row = forum_threads::Entity::find_by_id(thread_id)
            .filter(forum_threads::Column::Country.eq(country.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query forum thread")?;

        row.map(map_thread).transpose()
    }

    pub async fn insert_thread(&self, thread: &ForumThread) -> Result<()> {
        let active = forum_threads::ActiveModel {
            id: Set(thread.id.clone()),
            title: Set(thread.title.clone()),
            content: Set(thread.content.clone()),
            category: Set(thread.category.clone()),
            country: Set(thread.country.as_str().to_string()),
            user_id: Set(thread.user_id),
            username: Set(thread.username.clone()),
            view_count: Set(thread.view_count),
            post_count: Set(thread.post_count),
            is_pinned: Set(thread.is_pinned),
            is_locked: Set(thread.is_locked),
            tags: Set(encode_tags(&thread.tags)?),
            listing_id: Set(thread.listing_id.clone()),
            created_at: Set(thread.created_at.to_rfc3339()),
            updated_at: Set(thread.updated_at.to_rfc3339()),
        };

        forum_threads::Entity::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert forum thread")?;

        Ok(())
    }

    /// Root posts of a thread in creation order, with replies attached to
    /// their parent. Only root posts count toward the page total.
    pub async fn root_posts(
        &self,
        thread_id: &str,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ForumPost>, u64)> {
        let query = forum_posts::Entity::find()
            .filter(forum_posts::Column::ThreadId.eq(thread_id))
            .filter(forum_posts::Column::ParentId.is_null());

        let total = query
            .clone()
            .count(&self.conn)
            .await
            .context("Failed to count forum posts")?;

        let rows = query
            .order_by_asc(forum_posts::Column::CreatedAt)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query forum posts")?;

        let mut roots = rows.into_iter().map(map_post).collect::<Result<Vec<_>>>()?;

        let root_ids: Vec<String> = roots.iter().map(|p| p.id.clone()).collect();
        if !root_ids.is_empty() {
            let reply_rows = forum_posts::Entity::find()
                .filter(forum_posts::Column::ParentId.is_in(root_ids))
                .order_by_asc(forum_posts::Column::CreatedAt)
                .all(&self.conn)
                .await
                .context("Failed to query post replies")?;

            for row in reply_rows {
                let reply = map_post(row)?;
                if let Some(root) = roots
                    .iter_mut()
                    .find(|r| Some(r.id.as_str()) == reply.parent_id.as_deref())
                {
                    root.replies.push(reply);
                }
            }
        }

        Ok((roots, total))
    }

    pub async fn get_post(&self, thread_id: &str, post_id: &str) -> Result<Option<ForumPost>> {
        let row = forum_posts::Entity::find_by_id(post_id)
            .filter(forum_posts::Column::ThreadId.eq(thread_id))
            .one(&self.conn)
            .await
            .context("Failed to query forum post")?;

        row.map(map_post).transpose()
    }

    pub async fn insert_post(&self, post: &ForumPost) -> Result<()> {
        let active = forum_posts::ActiveModel {
            id: Set(post.id.clone()),
            thread_id: Set(post.thread_id.clone()),
            user_id: Set(post.user_id),
            username: Set(post.username.clone()),
            content: Set(post.content.clone()),
            parent_id: Set(post.parent_id.clone()),
            likes: Set(post.likes),
            is_edited: Set(post.is_edited),
            created_at: Set(post.created_at.to_rfc3339()),
        };

        forum_posts::Entity::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert forum post")?;

        Ok(())
    }

    pub async fn increment_view_count(&self, thread_id: &str) -> Result<()> {
        forum_threads::Entity::update_many()
            .col_expr(
                forum_threads::Column::ViewCount,
                Expr::col(forum_threads::Column::ViewCount).add(1),
            )
            .filter(forum_threads::Column::Id.eq(thread_id))
            .exec(&self.conn)
            .await
            .context("Failed to increment thread view count")?;
        Ok(())
    }

    pub async fn increment_post_count(&self, thread_id: &str) -> Result<()> {
        forum_threads::Entity::update_many()
            .col_expr(
                forum_threads::Column::PostCount,
                Expr::col(forum_threads::Column::PostCount).add(1),
            )
            .col_expr(
                forum_threads::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(forum_threads::Column::Id.eq(thread_id))
            .exec(&self.conn)
            .await
            .context("Failed to increment thread post count")?;
        Ok(())
    }
}

fn encode_tags(tags: &[String]) -> Result<Option<String>> {
    if tags.is_empty() {
        Ok(None)
    } else {
        Ok(Some(
            serde_json::to_string(tags).context("Failed to encode thread tags")?,
        ))
    }
}

fn decode_tags(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .with_context(|| format!("Invalid forum timestamp {raw}"))
}

fn map_thread(row: forum_threads::Model) -> Result<ForumThread> {
    let country = CountryCode::parse(&row.country)
        .ok_or_else(|| anyhow::anyhow!("Thread {} has unknown country {}", row.id, row.country))?;

    Ok(ForumThread {
        country,
        tags: decode_tags(row.tags.as_deref()),
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        id: row.id,
        title: row.title,
        content: row.content,
        category: row.category,
        user_id: row.user_id,
        username: row.username,
        view_count: row.view_count,
        post_count: row.post_count,
        is_pinned: row.is_pinned,
        is_locked: row.is_locked,
        listing_id: row.listing_id,
    })
}

fn map_post(row: forum_posts::Model) -> Result<ForumPost> {
    Ok(ForumPost {
        created_at: parse_ts(&row.created_at)?,
        id: row.id,
        thread_id: row.thread_id,
        user_id: row.user_id,
        username: row.username,
        content: row.content,
        parent_id: row.parent_id,
        likes: row.likes,
        is_edited: row.is_edited,
        replies: Vec::new(),
    })
}
