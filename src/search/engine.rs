use async_trait::async_trait;
use std::sync::Arc;

use super::criteria::SearchCriteria;
use super::paginate::{self, Page};
use super::{filter, sort};
use crate::country::CountryCode;
use crate::models::listing::Listing;

/// Storage access for the query engine.
///
/// Implementations return every candidate for a country in ascending id
/// order. The engine owns filtering, sorting and pagination, so any two
/// sources backed by the same data produce byte-identical pages.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_candidates(&self, country: CountryCode) -> anyhow::Result<Vec<Listing>>;
}

/// The listing query engine: country scope, then filters, then a stable
/// sort, then pagination, in that fixed order.
#[derive(Clone)]
pub struct SearchEngine {
    source: Arc<dyn ListingSource>,
}

impl SearchEngine {
    #[must_use]
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self { source }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> anyhow::Result<Page<Listing>> {
        let candidates = self.source.fetch_candidates(criteria.country).await?;

        let mut matched: Vec<Listing> = candidates
            .into_iter()
            .filter(|listing| filter::matches(listing, criteria))
            .collect();

        sort::apply(&mut matched, criteria.sort_by);

        Ok(paginate::paginate(matched, criteria.page, criteria.limit))
    }
}

/// In-memory source over a fixed snapshot. Used when `marketplace.sample_data`
/// is enabled and by tests that pin engine behavior against the live path.
pub struct SampleListingSource {
    listings: Vec<Listing>,
}

impl SampleListingSource {
    #[must_use]
    pub fn new(mut listings: Vec<Listing>) -> Self {
        // Same candidate order as the database source.
        listings.sort_by(|a, b| a.id.cmp(&b.id));
        Self { listings }
    }
}

#[async_trait]
impl ListingSource for SampleListingSource {
    async fn fetch_candidates(&self, country: CountryCode) -> anyhow::Result<Vec<Listing>> {
        Ok(self
            .listings
            .iter()
            .filter(|l| l.country == country)
            .cloned()
            .collect())
    }
}
