use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::search::{ListingSource, SampleListingSource};
use crate::services::{
    CheckoutClient, DbListingSource, ForumService, ListingService, NotificationService,
};

/// Everything the API handlers share. Built once at startup.
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,
    pub store: Store,
    pub listing_service: ListingService,
    pub forum_service: ForumService,
    pub checkout: CheckoutClient,
    pub notifications: Arc<NotificationService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let source: Arc<dyn ListingSource> = if config.marketplace.sample_data {
            info!("Serving the built-in sample inventory");
            Arc::new(SampleListingSource::new(crate::sample::sample_listings()))
        } else {
            Arc::new(DbListingSource::new(store.clone()))
        };

        let listing_service = ListingService::new(source);
        let notifications = Arc::new(NotificationService::new(store.clone()));
        let forum_service = ForumService::new(store.clone(), notifications.clone());
        let checkout = CheckoutClient::new(config.checkout.clone())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            listing_service,
            forum_service,
            checkout,
            notifications,
        })
    }
}
