pub mod criteria;
pub mod engine;
pub mod filter;
pub mod paginate;
pub mod sort;

pub use criteria::{Pagination, SearchCriteria, SortBy};
pub use engine::{ListingSource, SampleListingSource, SearchEngine};
pub use paginate::Page;
