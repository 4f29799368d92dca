use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::country::CountryCode;
use crate::db::{Store, User};
use crate::models::forum::{ForumPost, ForumThread};
use crate::models::notification::NewNotification;
use crate::search::Page;
use crate::services::notification::NotificationService;

#[derive(Debug, Error)]
pub enum ForumError {
    #[error("Thread not found")]
    ThreadNotFound,

    #[error("Parent post not found")]
    ParentNotFound,

    #[error("Thread is locked")]
    ThreadLocked,

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub listing_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub parent_id: Option<String>,
}

pub struct ForumService {
    store: Store,
    notifications: Arc<NotificationService>,
}

impl ForumService {
    #[must_use]
    pub fn new(store: Store, notifications: Arc<NotificationService>) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub async fn list_threads(
        &self,
        country: CountryCode,
        category: Option<&str>,
        page: u64,
        limit: u64,
    ) -> anyhow::Result<Page<ForumThread>> {
        let (threads, total) = self
            .store
            .list_threads(country, category, page, limit)
            .await?;
        Ok(Page::from_parts(threads, total, page, limit))
    }

    pub async fn create_thread(
        &self,
        country: CountryCode,
        user: &User,
        input: NewThread,
    ) -> anyhow::Result<ForumThread> {
        let now = Utc::now();
        let thread = ForumThread {
            id: format!("thread_{}", Uuid::new_v4()),
            title: input.title,
            content: input.content,
            category: input.category,
            country,
            user_id: user.id,
            username: user.username.clone(),
            view_count: 0,
            post_count: 0,
            is_pinned: false,
            is_locked: false,
            tags: input.tags,
            listing_id: input.listing_id,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_thread(&thread).await?;
        Ok(thread)
    }

    /// Thread detail with one page of root posts. Bumps the view counter as
    /// a side effect, like any detail-page read.
    pub async fn thread_with_posts(
        &self,
        country: CountryCode,
        thread_id: &str,
        page: u64,
        limit: u64,
    ) -> anyhow::Result<Option<(ForumThread, Page<ForumPost>)>> {
        let Some(mut thread) = self.store.get_thread(country, thread_id).await? else {
            return Ok(None);
        };

        self.store.increment_thread_views(thread_id).await?;
        // The row was read before the bump; the response must count this view.
        thread.view_count += 1;

        let (posts, total) = self.store.root_posts(thread_id, page, limit).await?;
        Ok(Some((thread, Page::from_parts(posts, total, page, limit))))
    }

    pub async fn create_post(
        &self,
        country: CountryCode,
        thread_id: &str,
        user: &User,
        input: NewPost,
    ) -> Result<ForumPost, ForumError> {
        let thread = self
            .store
            .get_thread(country, thread_id)
            .await?
            .ok_or(ForumError::ThreadNotFound)?;

        if thread.is_locked {
            return Err(ForumError::ThreadLocked);
        }

        if let Some(parent_id) = &input.parent_id {
            self.store
                .get_post(thread_id, parent_id)
                .await?
                .ok_or(ForumError::ParentNotFound)?;
        }

        let post = ForumPost {
            id: format!("post_{}", Uuid::new_v4()),
            thread_id: thread_id.to_string(),
            user_id: user.id,
            username: user.username.clone(),
            content: input.content,
            parent_id: input.parent_id,
            likes: 0,
            is_edited: false,
            created_at: Utc::now(),
            replies: Vec::new(),
        };

        self.store.insert_post(&post).await?;
        self.store.increment_thread_posts(thread_id).await?;

        if thread.user_id != user.id {
            self.notifications
                .create(NewNotification {
                    user_id: thread.user_id,
                    kind: "reply".to_string(),
                    title: format!("New reply from {}", user.username),
                    body: Some(preview(&post.content)),
                    link: Some(format!(
                        "/forums/{}/{}",
                        country.as_str().to_lowercase(),
                        thread_id
                    )),
                    related_id: Some(post.id.clone()),
                    related_type: Some("post".to_string()),
                })
                .await;
        }

        Ok(post)
    }
}

fn preview(content: &str) -> String {
    const MAX: usize = 100;
    if content.chars().count() <= MAX {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(MAX).collect();
        format!("{truncated}...")
    }
}
