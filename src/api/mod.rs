pub mod auth;
pub mod checkout;
pub mod error;
pub mod forums;
pub mod listings;
pub mod notifications;
pub mod observability;
pub mod system;
pub mod types;
pub mod validation;

use axum::Router;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::services::{CheckoutClient, ForumService, ListingService, NotificationService};
use crate::state::SharedState;

/// Handler-facing application state. Cheap to clone; everything heavy
/// lives behind the shared `Arc`.
#[derive(Clone)]
pub struct AppState {
    shared: Arc<SharedState>,
    start_time: Instant,
    prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(shared: Arc<SharedState>, prometheus_handle: Option<PrometheusHandle>) -> Self {
        Self {
            shared,
            start_time: Instant::now(),
            prometheus_handle,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn listings(&self) -> &ListingService {
        &self.shared.listing_service
    }

    #[must_use]
    pub fn forums(&self) -> &ForumService {
        &self.shared.forum_service
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.shared.checkout
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationService {
        &self.shared.notifications
    }

    #[must_use]
    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    #[must_use]
    pub const fn prometheus_handle(&self) -> Option<&PrometheusHandle> {
        self.prometheus_handle.as_ref()
    }
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<AppState> {
    let shared = SharedState::new(config).await?;
    Ok(AppState::new(Arc::new(shared), prometheus_handle))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/listings/deals", get(listings::get_deals))
        .route("/listings/{country}", get(listings::search_listings))
        .route("/listings/{country}/{id}", get(listings::get_listing))
        .route(
            "/forums/{country}",
            get(forums::list_threads).post(forums::create_thread),
        )
        .route(
            "/forums/{country}/{thread_id}",
            get(forums::get_thread).post(forums::create_post),
        )
        .route("/checkout", post(checkout::create_checkout_session))
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{o}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn create_app(state: AppState) -> Router {
    let origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(60)));

    Router::new()
        .nest("/api", api_routes())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(session_layer)
        .layer(cors_layer(&origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
