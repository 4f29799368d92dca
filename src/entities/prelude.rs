pub use super::forum_posts::Entity as ForumPosts;
pub use super::forum_threads::Entity as ForumThreads;
pub use super::listings::Entity as Listings;
pub use super::notifications::Entity as Notifications;
pub use super::users::Entity as Users;
