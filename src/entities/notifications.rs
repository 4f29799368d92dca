use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(column_name = "type")]
    pub kind: String,

    pub title: String,

    pub body: Option<String>,

    pub link: Option<String>,

    pub related_id: Option<String>,

    pub related_type: Option<String>,

    /// RFC 3339 timestamp; NULL while unread.
    pub read_at: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
