use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    pub make: String,

    pub model: String,

    pub year: i32,

    /// Whole units of the market currency.
    pub price: i64,

    pub currency: String,

    pub mileage: Option<i64>,

    pub fuel_type: Option<String>,

    pub transmission: Option<String>,

    pub engine: Option<String>,

    pub location: String,

    /// Upper-case market code (CA, SG, MY, ID, TH).
    pub country: String,

    pub rating: Option<f32>,

    pub review_count: Option<i32>,

    pub description: Option<String>,

    pub seller_name: Option<String>,

    pub seller_type: Option<String>,

    /// Only "active" rows are served; other values hide a listing.
    pub status: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
