use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::types::{DealsBody, ListingPageBody};
use crate::api::validation::{validate_country, validate_pagination};
use crate::country::CountryCode;
use crate::search::{SearchCriteria, SortBy};

/// Search results stay fresh for a minute at the edge, with a grace window
/// for revalidation.
const LISTING_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// Raw search params, straight off the query string. Everything is an
/// optional string here; coercion into typed criteria is lenient, so an
/// unparseable number simply drops that constraint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub min_mileage: Option<String>,
    pub max_mileage: Option<String>,
    pub location: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_num<T: std::str::FromStr>(value: Option<&String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

impl ListingQuery {
    fn into_criteria(self, country: CountryCode) -> SearchCriteria {
        let pagination = validate_pagination(self.page.as_deref(), self.limit.as_deref());

        SearchCriteria {
            country,
            make: none_if_empty(self.make),
            model: none_if_empty(self.model),
            min_price: parse_num(self.min_price.as_ref()),
            max_price: parse_num(self.max_price.as_ref()),
            min_year: parse_num(self.min_year.as_ref()),
            max_year: parse_num(self.max_year.as_ref()),
            fuel_type: none_if_empty(self.fuel_type),
            transmission: none_if_empty(self.transmission),
            min_mileage: parse_num(self.min_mileage.as_ref()),
            max_mileage: parse_num(self.max_mileage.as_ref()),
            location: none_if_empty(self.location),
            sort_by: SortBy::parse(self.sort_by.as_deref().unwrap_or_default()),
            page: pagination.page,
            limit: pagination.limit,
        }
    }
}

pub async fn search_listings(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let country = validate_country(&country)?;
    let criteria = query.into_criteria(country);
    let page = state.listings().search(&criteria).await?;

    Ok((
        [(header::CACHE_CONTROL, LISTING_CACHE_CONTROL)],
        Json(ListingPageBody::from(page)),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct DealsQuery {
    pub country: Option<String>,
    pub limit: Option<String>,
}

/// Newest listings for the storefront. The country falls back to the
/// configured default market rather than erroring, matching how anonymous
/// visitors without a market preference are treated elsewhere.
pub async fn get_deals(
    State(state): State<AppState>,
    Query(query): Query<DealsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (default_country, default_limit) = {
        let config = state.config().read().await;
        (
            config.marketplace.default_country.clone(),
            config.marketplace.deals_limit,
        )
    };

    let country = query
        .country
        .as_deref()
        .and_then(CountryCode::parse)
        .or_else(|| CountryCode::parse(&default_country))
        .unwrap_or(CountryCode::CA);

    let limit = query
        .limit
        .as_deref()
        .and_then(|l| l.parse::<u64>().ok())
        .map_or(default_limit, |l| l.clamp(1, 50));

    let deals = state.listings().deals(country, limit).await;

    Ok((
        [(header::CACHE_CONTROL, LISTING_CACHE_CONTROL)],
        Json(DealsBody { deals }),
    ))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path((country, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let country = validate_country(&country)?;

    let listing = state
        .listings()
        .get(country, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    Ok((
        [(header::CACHE_CONTROL, LISTING_CACHE_CONTROL)],
        Json(listing),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_criteria_drops_unparseable_numbers() {
        let query = ListingQuery {
            min_price: Some("cheap".to_string()),
            max_price: Some("50000".to_string()),
            ..ListingQuery::default()
        };

        let criteria = query.into_criteria(CountryCode::SG);
        assert_eq!(criteria.min_price, None);
        assert_eq!(criteria.max_price, Some(50_000));
    }

    #[test]
    fn test_into_criteria_treats_empty_strings_as_absent() {
        let query = ListingQuery {
            make: Some(String::new()),
            model: Some("Civic".to_string()),
            ..ListingQuery::default()
        };

        let criteria = query.into_criteria(CountryCode::MY);
        assert_eq!(criteria.make, None);
        assert_eq!(criteria.model.as_deref(), Some("Civic"));
    }

    #[test]
    fn test_into_criteria_unknown_sort_falls_back_to_newest() {
        let query = ListingQuery {
            sort_by: Some("bogus".to_string()),
            ..ListingQuery::default()
        };

        let criteria = query.into_criteria(CountryCode::TH);
        assert_eq!(criteria.sort_by, SortBy::Newest);
    }
}
