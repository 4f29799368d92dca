use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::country::CountryCode;
use crate::models::forum::{ForumPost, ForumThread};
use crate::models::listing::Listing;
use crate::models::notification::{NewNotification, Notification};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

/// Facade over the repository layer. Cheap to clone; every clone shares the
/// same connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn listing_repo(&self) -> repositories::listing::ListingRepository {
        repositories::listing::ListingRepository::new(self.conn.clone())
    }

    fn forum_repo(&self) -> repositories::forum::ForumRepository {
        repositories::forum::ForumRepository::new(self.conn.clone())
    }

    fn notification_repo(&self) -> repositories::notification::NotificationRepository {
        repositories::notification::NotificationRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // --- listings ---

    pub async fn listings_by_country(&self, country: CountryCode) -> Result<Vec<Listing>> {
        self.listing_repo().by_country(country).await
    }

    pub async fn upsert_listings(&self, listings: &[Listing]) -> Result<usize> {
        self.listing_repo().upsert_many(listings).await
    }

    pub async fn listing_count(&self) -> Result<u64> {
        self.listing_repo().count().await
    }

    // --- forums ---

    pub async fn list_threads(
        &self,
        country: CountryCode,
        category: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ForumThread>, u64)> {
        self.forum_repo()
            .list_threads(country, category, page, limit)
            .await
    }

    pub async fn get_thread(
        &self,
        country: CountryCode,
        thread_id: &str,
    ) -> Result<Option<ForumThread>> {
        self.forum_repo().get_thread(country, thread_id).await
    }

    pub async fn insert_thread(&self, thread: &ForumThread) -> Result<()> {
        self.forum_repo().insert_thread(thread).await
    }

    pub async fn root_posts(
        &self,
        thread_id: &str,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ForumPost>, u64)> {
        self.forum_repo().root_posts(thread_id, page, limit).await
    }

    pub async fn get_post(&self, thread_id: &str, post_id: &str) -> Result<Option<ForumPost>> {
        self.forum_repo().get_post(thread_id, post_id).await
    }

    pub async fn insert_post(&self, post: &ForumPost) -> Result<()> {
        self.forum_repo().insert_post(post).await
    }

    pub async fn increment_thread_views(&self, thread_id: &str) -> Result<()> {
        self.forum_repo().increment_view_count(thread_id).await
    }

    pub async fn increment_thread_posts(&self, thread_id: &str) -> Result<()> {
        self.forum_repo().increment_post_count(thread_id).await
    }

    // --- notifications ---

    pub async fn insert_notification(&self, input: NewNotification) -> Result<Notification> {
        self.notification_repo().insert(input).await
    }

    pub async fn notifications_for_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        self.notification_repo()
            .list_for_user(user_id, limit, offset, unread_only)
            .await
    }

    pub async fn unread_notification_count(&self, user_id: i32) -> Result<u64> {
        self.notification_repo().unread_count(user_id).await
    }

    pub async fn mark_notification_read(&self, id: i32, user_id: i32) -> Result<bool> {
        self.notification_repo().mark_read(id, user_id).await
    }

    pub async fn mark_all_notifications_read(&self, user_id: i32) -> Result<u64> {
        self.notification_repo().mark_all_read(user_id).await
    }

    // --- users ---

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(&self, username: &str, new_password: &str) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }
}
