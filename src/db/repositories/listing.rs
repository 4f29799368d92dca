use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::country::CountryCode;
use crate::entities::listings;
use crate::models::listing::Listing;

pub struct ListingRepository {
    conn: DatabaseConnection,
}

impl ListingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All active listings for a market, in ascending id order. The query
    /// engine relies on that order for stable-sort tie-breaking.
    pub async fn by_country(&self, country: CountryCode) -> Result<Vec<Listing>> {
        let rows = listings::Entity::find()
            .filter(listings::Column::Country.eq(country.as_str()))
            .filter(listings::Column::Status.eq("active"))
            .order_by_asc(listings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query listings by country")?;

        rows.into_iter().map(map_row).collect()
    }

    pub async fn upsert_many(&self, listings_in: &[Listing]) -> Result<usize> {
        let mut written = 0;
        for listing in listings_in {
            let active = to_active(listing);
            listings::Entity::insert(active)
                .on_conflict(
                    OnConflict::column(listings::Column::Id)
                        .update_columns([
                            listings::Column::Title,
                            listings::Column::Make,
                            listings::Column::Model,
                            listings::Column::Year,
                            listings::Column::Price,
                            listings::Column::Currency,
                            listings::Column::Mileage,
                            listings::Column::FuelType,
                            listings::Column::Transmission,
                            listings::Column::Engine,
                            listings::Column::Location,
                            listings::Column::Country,
                            listings::Column::Rating,
                            listings::Column::ReviewCount,
                            listings::Column::Description,
                            listings::Column::SellerName,
                            listings::Column::SellerType,
                            listings::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(&self.conn)
                .await
                .with_context(|| format!("Failed to upsert listing {}", listing.id))?;
            written += 1;
        }
        Ok(written)
    }

    pub async fn count(&self) -> Result<u64> {
        listings::Entity::find()
            .filter(listings::Column::Status.eq("active"))
            .count(&self.conn)
            .await
            .context("Failed to count listings")
    }
}

fn map_row(row: listings::Model) -> Result<Listing> {
    let country = CountryCode::parse(&row.country)
        .ok_or_else(|| anyhow::anyhow!("Listing {} has unknown country {}", row.id, row.country))?;

    Ok(Listing {
        country,
        created_at: parse_ts(&row.created_at, &row.id)?,
        updated_at: parse_ts(&row.updated_at, &row.id)?,
        id: row.id,
        title: row.title,
        make: row.make,
        model: row.model,
        year: row.year,
        price: row.price,
        currency: row.currency,
        mileage: row.mileage,
        fuel_type: row.fuel_type,
        transmission: row.transmission,
        engine: row.engine,
        location: row.location,
        rating: row.rating,
        review_count: row.review_count,
        description: row.description,
        seller_name: row.seller_name,
        seller_type: row.seller_type,
    })
}

fn parse_ts(raw: &str, id: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .with_context(|| format!("Listing {id} has invalid timestamp {raw}"))
}

fn to_active(listing: &Listing) -> listings::ActiveModel {
    listings::ActiveModel {
        id: Set(listing.id.clone()),
        title: Set(listing.title.clone()),
        make: Set(listing.make.clone()),
        model: Set(listing.model.clone()),
        year: Set(listing.year),
        price: Set(listing.price),
        currency: Set(listing.currency.clone()),
        mileage: Set(listing.mileage),
        fuel_type: Set(listing.fuel_type.clone()),
        transmission: Set(listing.transmission.clone()),
        engine: Set(listing.engine.clone()),
        location: Set(listing.location.clone()),
        country: Set(listing.country.as_str().to_string()),
        rating: Set(listing.rating),
        review_count: Set(listing.review_count),
        description: Set(listing.description.clone()),
        seller_name: Set(listing.seller_name.clone()),
        seller_type: Set(listing.seller_type.clone()),
        status: Set("active".to_string()),
        created_at: Set(listing.created_at.to_rfc3339()),
        updated_at: Set(listing.updated_at.to_rfc3339()),
    }
}
