use super::criteria::SearchCriteria;
use crate::models::listing::Listing;

/// Whether a listing satisfies every predicate in the criteria.
///
/// Country scope is checked first and is never optional. The remaining
/// predicates AND together: exact equality for make/fuel/transmission,
/// case-insensitive substring for model/location, inclusive bounds for the
/// numeric ranges. A listing without a mileage value fails any mileage
/// bound, mirroring SQL NULL comparison semantics on the live path.
#[must_use]
pub fn matches(listing: &Listing, criteria: &SearchCriteria) -> bool {
    if listing.country != criteria.country {
        return false;
    }

    if let Some(make) = &criteria.make
        && listing.make != *make
    {
        return false;
    }

    if let Some(model) = &criteria.model
        && !listing
            .model
            .to_lowercase()
            .contains(&model.to_lowercase())
    {
        return false;
    }

    if let Some(fuel_type) = &criteria.fuel_type
        && listing.fuel_type.as_deref() != Some(fuel_type.as_str())
    {
        return false;
    }

    if let Some(transmission) = &criteria.transmission
        && listing.transmission.as_deref() != Some(transmission.as_str())
    {
        return false;
    }

    if let Some(location) = &criteria.location
        && !listing
            .location
            .to_lowercase()
            .contains(&location.to_lowercase())
    {
        return false;
    }

    if let Some(min_price) = criteria.min_price
        && listing.price < min_price
    {
        return false;
    }

    if let Some(max_price) = criteria.max_price
        && listing.price > max_price
    {
        return false;
    }

    if let Some(min_year) = criteria.min_year
        && listing.year < min_year
    {
        return false;
    }

    if let Some(max_year) = criteria.max_year
        && listing.year > max_year
    {
        return false;
    }

    if criteria.min_mileage.is_some() || criteria.max_mileage.is_some() {
        let Some(mileage) = listing.mileage else {
            return false;
        };
        if let Some(min_mileage) = criteria.min_mileage
            && mileage < min_mileage
        {
            return false;
        }
        if let Some(max_mileage) = criteria.max_mileage
            && mileage > max_mileage
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::CountryCode;
    use chrono::{TimeZone, Utc};

    fn listing() -> Listing {
        Listing {
            id: "lst_sg_001".to_string(),
            title: "2023 Toyota Vios".to_string(),
            make: "Toyota".to_string(),
            model: "Vios".to_string(),
            year: 2023,
            price: 85_000,
            currency: "SGD".to_string(),
            mileage: Some(15_000),
            fuel_type: Some("petrol".to_string()),
            transmission: Some("automatic".to_string()),
            engine: Some("1.5L".to_string()),
            location: "Singapore Central".to_string(),
            country: CountryCode::SG,
            rating: Some(4.5),
            review_count: Some(12),
            description: None,
            seller_name: None,
            seller_type: Some("dealer".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_country_scope_is_mandatory() {
        let mut criteria = SearchCriteria::new(CountryCode::MY);
        assert!(!matches(&listing(), &criteria));
        criteria.country = CountryCode::SG;
        assert!(matches(&listing(), &criteria));
    }

    #[test]
    fn test_make_is_exact_match() {
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        criteria.make = Some("Toyota".to_string());
        assert!(matches(&listing(), &criteria));
        criteria.make = Some("toyota".to_string());
        assert!(!matches(&listing(), &criteria));
    }

    #[test]
    fn test_model_is_case_insensitive_substring() {
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        criteria.model = Some("vio".to_string());
        assert!(matches(&listing(), &criteria));
        criteria.model = Some("VIOS".to_string());
        assert!(matches(&listing(), &criteria));
        criteria.model = Some("civic".to_string());
        assert!(!matches(&listing(), &criteria));
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        criteria.location = Some("central".to_string());
        assert!(matches(&listing(), &criteria));
        criteria.location = Some("jurong".to_string());
        assert!(!matches(&listing(), &criteria));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        criteria.min_price = Some(85_000);
        criteria.max_price = Some(85_000);
        assert!(matches(&listing(), &criteria));
        criteria.min_price = Some(85_001);
        assert!(!matches(&listing(), &criteria));
        criteria.min_price = None;
        criteria.max_price = Some(84_999);
        assert!(!matches(&listing(), &criteria));
    }

    #[test]
    fn test_year_bounds_are_inclusive() {
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        criteria.min_year = Some(2023);
        criteria.max_year = Some(2023);
        assert!(matches(&listing(), &criteria));
        criteria.min_year = Some(2024);
        assert!(!matches(&listing(), &criteria));
    }

    #[test]
    fn test_fuel_type_exact_match() {
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        criteria.fuel_type = Some("petrol".to_string());
        assert!(matches(&listing(), &criteria));
        criteria.fuel_type = Some("hybrid".to_string());
        assert!(!matches(&listing(), &criteria));
    }

    #[test]
    fn test_missing_mileage_fails_mileage_bounds() {
        let mut subject = listing();
        subject.mileage = None;
        let mut criteria = SearchCriteria::new(CountryCode::SG);
        assert!(matches(&subject, &criteria));
        criteria.min_mileage = Some(0);
        assert!(!matches(&subject, &criteria));
        criteria.min_mileage = None;
        criteria.max_mileage = Some(1_000_000);
        assert!(!matches(&subject, &criteria));
    }

    #[test]
    fn test_adding_a_filter_never_widens_the_result() {
        let subject = listing();
        let base = SearchCriteria::new(CountryCode::SG);
        let mut narrowed = base.clone();
        narrowed.fuel_type = Some("petrol".to_string());
        narrowed.min_price = Some(80_000);

        // Anything the narrowed criteria accept, the base criteria accept too.
        if matches(&subject, &narrowed) {
            assert!(matches(&subject, &base));
        }
    }
}
