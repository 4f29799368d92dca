use serde::Serialize;

/// One page of results plus the totals a client needs to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page when the slice has already been taken elsewhere
    /// (e.g. in a SQL OFFSET/LIMIT query). The page math is the single
    /// source of truth for `total_pages`.
    #[must_use]
    pub fn from_parts(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    #[must_use]
    pub fn empty(page: u64, limit: u64) -> Self {
        Self::from_parts(Vec::new(), 0, page, limit)
    }
}

/// Slice a fully materialized result set into the requested page.
///
/// Expects coerced pagination inputs (page >= 1, limit >= 1). A start offset
/// past the end yields an empty `items` with the totals intact.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u64, limit: u64) -> Page<T> {
    let total = items.len() as u64;
    let start = page.saturating_sub(1).saturating_mul(limit);

    let selected = if start >= total {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect()
    };

    Page::from_parts(selected, total, page, limit)
}
