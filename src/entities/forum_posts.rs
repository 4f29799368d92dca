use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forum_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub thread_id: String,

    pub user_id: i32,

    pub username: String,

    pub content: String,

    /// Set on replies; NULL marks a root post.
    pub parent_id: Option<String>,

    pub likes: i64,

    pub is_edited: bool,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forum_threads::Entity",
        from = "Column::ThreadId",
        to = "super::forum_threads::Column::Id"
    )]
    ForumThreads,
}

impl Related<super::forum_threads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForumThreads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
