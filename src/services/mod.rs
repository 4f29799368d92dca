pub mod checkout;
pub mod forum;
pub mod listing;
pub mod notification;

pub use checkout::{CartItem, CheckoutClient, CheckoutError, CheckoutSession};
pub use forum::{ForumError, ForumService, NewPost, NewThread};
pub use listing::{DbListingSource, ListingService};
pub use notification::NotificationService;
