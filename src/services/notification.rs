use anyhow::Result;
use tracing::warn;

use crate::db::Store;
use crate::models::notification::{NewNotification, Notification};

pub struct NotificationService {
    store: Store,
}

impl NotificationService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Best-effort creation. A failed write is logged and swallowed so the
    /// triggering operation (a reply, a sale) never fails because of it.
    pub async fn create(&self, input: NewNotification) -> Option<Notification> {
        match self.store.insert_notification(input).await {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!("Failed to create notification: {e}");
                None
            }
        }
    }

    pub async fn list(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        self.store
            .notifications_for_user(user_id, limit, offset, unread_only)
            .await
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64> {
        self.store.unread_notification_count(user_id).await
    }

    pub async fn mark_read(&self, id: i32, user_id: i32) -> Result<bool> {
        self.store.mark_notification_read(id, user_id).await
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64> {
        self.store.mark_all_notifications_read(user_id).await
    }
}
