use super::criteria::SortBy;
use crate::models::listing::Listing;

/// Order listings by the requested key. All sorts are stable, so listings
/// that compare equal keep their pre-sort (ascending id) order and repeated
/// queries paginate identically.
pub fn apply(listings: &mut [Listing], sort_by: SortBy) {
    match sort_by {
        SortBy::Newest => listings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::PriceAsc => listings.sort_by_key(|l| l.price),
        SortBy::PriceDesc => listings.sort_by(|a, b| b.price.cmp(&a.price)),
        SortBy::YearDesc => listings.sort_by(|a, b| b.year.cmp(&a.year)),
        // Listings without a recorded mileage sort first.
        SortBy::MileageAsc => listings.sort_by_key(|l| l.mileage.unwrap_or(0)),
    }
}
