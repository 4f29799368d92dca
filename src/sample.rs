//! A small cross-market snapshot of listings. Serves the in-memory listing
//! source, the `seed` CLI command, and the integration tests, so every
//! consumer sees the same data.

use chrono::{DateTime, TimeZone, Utc};

use crate::country::CountryCode;
use crate::models::listing::Listing;

fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    make: &str,
    model: &str,
    year: i32,
    price: i64,
    mileage: Option<i64>,
    fuel_type: &str,
    transmission: &str,
    location: &str,
    country: CountryCode,
    created_at: DateTime<Utc>,
) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year,
        price,
        currency: country.currency().to_string(),
        mileage,
        fuel_type: Some(fuel_type.to_string()),
        transmission: Some(transmission.to_string()),
        engine: None,
        location: location.to_string(),
        country,
        rating: None,
        review_count: None,
        description: None,
        seller_name: None,
        seller_type: Some("dealer".to_string()),
        created_at,
        updated_at: created_at,
    }
}

/// Two listings per market, ids already in ascending order.
#[must_use]
pub fn sample_listings() -> Vec<Listing> {
    vec![
        listing(
            "lst_ca_001",
            "2021 Ford F-150 XLT",
            "Ford",
            "F-150",
            2021,
            48_000,
            Some(62_000),
            "petrol",
            "automatic",
            "Toronto, ON",
            CountryCode::CA,
            ts(2024, 10, 20, 9),
        ),
        listing(
            "lst_ca_002",
            "2023 Tesla Model 3 Long Range",
            "Tesla",
            "Model 3",
            2023,
            54_000,
            Some(21_000),
            "electric",
            "automatic",
            "Vancouver, BC",
            CountryCode::CA,
            ts(2024, 10, 28, 14),
        ),
        listing(
            "lst_id_001",
            "2021 Toyota Avanza G",
            "Toyota",
            "Avanza",
            2021,
            230_000_000,
            Some(41_000),
            "petrol",
            "manual",
            "Jakarta Selatan",
            CountryCode::ID,
            ts(2024, 10, 25, 8),
        ),
        listing(
            "lst_id_002",
            "2022 Honda Brio Satya",
            "Honda",
            "Brio",
            2022,
            175_000_000,
            Some(18_500),
            "petrol",
            "cvt",
            "Bandung",
            CountryCode::ID,
            ts(2024, 11, 2, 11),
        ),
        listing(
            "lst_my_001",
            "2022 Perodua Myvi 1.5 AV",
            "Perodua",
            "Myvi",
            2022,
            52_000,
            Some(28_000),
            "petrol",
            "automatic",
            "Kuala Lumpur",
            CountryCode::MY,
            ts(2024, 10, 22, 10),
        ),
        listing(
            "lst_my_002",
            "2020 Proton Saga Premium",
            "Proton",
            "Saga",
            2020,
            38_000,
            Some(55_000),
            "petrol",
            "manual",
            "Penang",
            CountryCode::MY,
            ts(2024, 11, 3, 16),
        ),
        listing(
            "lst_sg_001",
            "2023 Toyota Vios 1.5 G",
            "Toyota",
            "Vios",
            2023,
            85_000,
            Some(15_000),
            "petrol",
            "automatic",
            "Singapore Central",
            CountryCode::SG,
            ts(2024, 11, 1, 10),
        ),
        listing(
            "lst_sg_002",
            "2022 Honda City 1.5 Hybrid",
            "Honda",
            "City",
            2022,
            92_000,
            Some(25_000),
            "hybrid",
            "cvt",
            "Singapore East",
            CountryCode::SG,
            ts(2024, 11, 5, 9),
        ),
        listing(
            "lst_th_001",
            "2021 Isuzu D-Max Hi-Lander",
            "Isuzu",
            "D-Max",
            2021,
            750_000,
            Some(47_000),
            "diesel",
            "manual",
            "Bangkok",
            CountryCode::TH,
            ts(2024, 10, 27, 13),
        ),
        listing(
            "lst_th_002",
            "2023 Honda City Turbo RS",
            "Honda",
            "City",
            2023,
            650_000,
            Some(9_000),
            "petrol",
            "cvt",
            "Chiang Mai",
            CountryCode::TH,
            ts(2024, 11, 4, 15),
        ),
    ]
}
