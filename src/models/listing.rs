use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::country::CountryCode;

/// Closed vocabulary for fuel types, enforced at ingestion. Filters match
/// these as exact strings.
pub const FUEL_TYPES: [&str; 4] = ["petrol", "diesel", "hybrid", "electric"];

/// Closed vocabulary for transmissions, enforced at ingestion.
pub const TRANSMISSIONS: [&str; 3] = ["automatic", "manual", "cvt"];

/// A vehicle listing. Prices are whole units of the market currency; the
/// currency tag always matches the country's currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: i64,
    pub currency: String,
    pub mileage: Option<i64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub engine: Option<String>,
    pub location: String,
    pub country: CountryCode,
    pub rating: Option<f32>,
    pub review_count: Option<i32>,
    pub description: Option<String>,
    pub seller_name: Option<String>,
    pub seller_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
