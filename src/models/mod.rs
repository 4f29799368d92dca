pub mod forum;
pub mod listing;
pub mod notification;
