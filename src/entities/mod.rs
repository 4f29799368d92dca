pub mod prelude;

pub mod forum_posts;
pub mod forum_threads;
pub mod listings;
pub mod notifications;
pub mod users;
