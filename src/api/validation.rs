use crate::api::error::ApiError;
use crate::country::CountryCode;
use crate::search::criteria::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, Pagination};

/// Validates a raw country path segment. Unknown codes are a client error,
/// not a silent fallback.
pub fn validate_country(raw: &str) -> Result<CountryCode, ApiError> {
    CountryCode::parse(raw).ok_or_else(|| ApiError::invalid_country(raw))
}

/// Coerces raw pagination params into a usable window. Never errors:
/// garbage and out-of-range values snap to defaults or the clamp bounds.
#[must_use]
pub fn validate_pagination(page: Option<&str>, limit: Option<&str>) -> Pagination {
    let page = page
        .and_then(|p| p.parse::<u64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(DEFAULT_PAGE);

    let limit = limit
        .and_then(|l| l.parse::<u64>().ok())
        .map_or(DEFAULT_LIMIT, |l| l.clamp(1, MAX_LIMIT));

    Pagination { page, limit }
}
