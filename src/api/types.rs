use serde::{Deserialize, Serialize};

use crate::models::forum::{ForumPost, ForumThread};
use crate::models::listing::Listing;
use crate::search::Page;
use crate::services::CartItem;

/// Search results body. The page of listings is flattened so the client
/// sees `listings` plus the paging fields at the top level.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPageBody {
    pub listings: Vec<Listing>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl From<Page<Listing>> for ListingPageBody {
    fn from(page: Page<Listing>) -> Self {
        Self {
            listings: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DealsBody {
    pub deals: Vec<Listing>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPageBody {
    pub threads: Vec<ForumThread>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl From<Page<ForumThread>> for ThreadPageBody {
    fn from(page: Page<ForumThread>) -> Self {
        Self {
            threads: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDetailBody {
    pub thread: ForumThread,
    pub posts: Vec<ForumPost>,
    pub total_posts: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub listing_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub version: String,
    pub uptime_seconds: u64,
    pub listings: u64,
    pub database: String,
}
