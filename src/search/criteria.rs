use crate::country::CountryCode;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Sort keys accepted on the wire. Unknown values fall back to `Newest`
/// rather than erroring, matching the lenient query-parameter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    YearDesc,
    MileageAsc,
}

impl SortBy {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            "year_desc" => Self::YearDesc,
            "mileage_asc" => Self::MileageAsc,
            _ => Self::Newest,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::YearDesc => "year_desc",
            Self::MileageAsc => "mileage_asc",
        }
    }
}

/// Coerced pagination inputs. Always usable: building one never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Normalized search input for one query. Country scope is mandatory,
/// everything else is optional. All range bounds are inclusive.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub country: CountryCode,
    pub make: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub min_mileage: Option<i64>,
    pub max_mileage: Option<i64>,
    pub location: Option<String>,
    pub sort_by: SortBy,
    pub page: u64,
    pub limit: u64,
}

impl SearchCriteria {
    /// Unfiltered criteria for a country with default sort and pagination.
    #[must_use]
    pub fn new(country: CountryCode) -> Self {
        Self {
            country,
            make: None,
            model: None,
            min_price: None,
            max_price: None,
            min_year: None,
            max_year: None,
            fuel_type: None,
            transmission: None,
            min_mileage: None,
            max_mileage: None,
            location: None,
            sort_by: SortBy::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}
