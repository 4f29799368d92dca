use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::country::CountryCode;
use crate::db::Store;
use crate::models::listing::Listing;
use crate::search::{ListingSource, Page, SearchCriteria, SearchEngine, SortBy};

/// Live listing source backed by the database.
pub struct DbListingSource {
    store: Store,
}

impl DbListingSource {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ListingSource for DbListingSource {
    async fn fetch_candidates(&self, country: CountryCode) -> anyhow::Result<Vec<Listing>> {
        self.store.listings_by_country(country).await
    }
}

/// Listing reads: search, deals, and single-listing lookup. All three go
/// through the same source, so the sample and live paths cannot disagree.
pub struct ListingService {
    engine: SearchEngine,
    source: Arc<dyn ListingSource>,
}

impl ListingService {
    #[must_use]
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self {
            engine: SearchEngine::new(source.clone()),
            source,
        }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> anyhow::Result<Page<Listing>> {
        self.engine.search(criteria).await
    }

    /// Newest listings for a market. Degrades to an empty list on failure:
    /// deals are a storefront garnish, not a hard dependency.
    pub async fn deals(&self, country: CountryCode, limit: u64) -> Vec<Listing> {
        let mut criteria = SearchCriteria::new(country);
        criteria.sort_by = SortBy::Newest;
        criteria.limit = limit;

        match self.engine.search(&criteria).await {
            Ok(page) => page.items,
            Err(e) => {
                warn!("Failed to fetch deals for {country}: {e}");
                Vec::new()
            }
        }
    }

    /// Single listing, scoped to the market it was requested under.
    pub async fn get(&self, country: CountryCode, id: &str) -> anyhow::Result<Option<Listing>> {
        let candidates = self.source.fetch_candidates(country).await?;
        Ok(candidates.into_iter().find(|l| l.id == id))
    }
}
