use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use motorly::api::{AppState, create_app, create_app_state_from_config};
use motorly::country::CountryCode;
use motorly::models::forum::ForumThread;
use motorly::sample::sample_listings;
use motorly::{Config, api};

const DEFAULT_API_KEY: &str = "motorly_default_api_key_please_regenerate";

async fn spawn_app() -> (Router, AppState) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = create_app_state_from_config(config, None)
        .await
        .expect("failed to build app state");
    let app = create_app(state.clone()).await;
    (app, state)
}

async fn spawn_seeded_app() -> (Router, AppState) {
    let (app, state) = spawn_app().await;
    state
        .store()
        .upsert_listings(&sample_listings())
        .await
        .expect("failed to seed listings");
    (app, state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_with_key(uri: &str, api_key: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Api-Key", api_key)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_authed(uri: &str, body: &Value) -> Request<Body> {
    post_json_with_key(uri, DEFAULT_API_KEY, body)
}

async fn seed_user(state: &AppState, username: &str, api_key: &str) {
    use sea_orm::{ActiveModelTrait, Set};

    let now = Utc::now().to_rfc3339();
    let user = motorly::entities::users::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        api_key: Set(api_key.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    user.insert(&state.store().conn)
        .await
        .expect("failed to seed user");
}

fn seed_thread(id: &str, locked: bool) -> ForumThread {
    let now = Utc::now();
    ForumThread {
        id: id.to_string(),
        title: "Dealer fees megathread".to_string(),
        content: "Archived discussion of dealer fees.".to_string(),
        category: "general".to_string(),
        country: CountryCode::SG,
        user_id: 1,
        username: "admin".to_string(),
        view_count: 0,
        post_count: 0,
        is_pinned: false,
        is_locked: locked,
        tags: Vec::new(),
        listing_id: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn unknown_country_is_rejected() {
    let (app, _state) = spawn_app().await;

    let response = app.oneshot(get("/api/listings/XX")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid country code: XX");
}

#[tokio::test]
async fn country_path_segment_is_case_insensitive() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app.oneshot(get("/api/listings/sg")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_filters_sorts_and_caches() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app
        .oneshot(get(
            "/api/listings/SG?fuelType=hybrid&sortBy=price_asc&limit=1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, s-maxage=60, stale-while-revalidate=300"
    );

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["listings"][0]["fuelType"], "hybrid");
    assert_eq!(body["listings"][0]["price"], 92_000);
    assert_eq!(body["listings"][0]["currency"], "SGD");
}

#[tokio::test]
async fn search_scopes_results_to_the_requested_country() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app.oneshot(get("/api/listings/CA")).await.unwrap();
    let body = body_json(response).await;

    let listings = body["listings"].as_array().unwrap();
    assert!(!listings.is_empty());
    for listing in listings {
        assert_eq!(listing["country"], "CA");
    }
}

#[tokio::test]
async fn price_floor_above_inventory_yields_empty_page() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app
        .oneshot(get("/api/listings/SG?minPrice=1000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["listings"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn pagination_params_are_coerced_not_rejected() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app
        .oneshot(get("/api/listings/SG?page=0&limit=9999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 100);

    let (app, _state) = spawn_seeded_app().await;
    let response = app
        .oneshot(get("/api/listings/SG?page=abc&limit=xyz"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 20);
}

#[tokio::test]
async fn listing_detail_found_and_missing() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/listings/SG/lst_sg_001"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "lst_sg_001");

    let response = app
        .oneshot(get("/api/listings/SG/lst_nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_detail_does_not_cross_markets() {
    let (app, _state) = spawn_seeded_app().await;

    // Exists in SG, requested under CA.
    let response = app
        .oneshot(get("/api/listings/CA/lst_sg_001"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deals_default_to_configured_market() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app.oneshot(get("/api/listings/deals")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let deals = body["deals"].as_array().unwrap();
    assert!(!deals.is_empty());
    for deal in deals {
        assert_eq!(deal["country"], "SG");
    }
}

#[tokio::test]
async fn deals_respect_country_and_limit_params() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app
        .oneshot(get("/api/listings/deals?country=my&limit=1"))
        .await
        .unwrap();
    let body = body_json(response).await;

    let deals = body["deals"].as_array().unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0]["country"], "MY");
}

#[tokio::test]
async fn creating_a_thread_requires_auth() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json(
            "/api/forums/SG",
            &json!({ "title": "t", "content": "c", "category": "general" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn thread_requires_title_content_and_category() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json_authed(
            "/api/forums/SG",
            &json!({ "title": "Missing the rest" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Title, content, and category are required");
}

#[tokio::test]
async fn thread_lifecycle_create_list_read_reply() {
    let (app, _state) = spawn_app().await;

    // Create.
    let response = app
        .clone()
        .oneshot(post_json_authed(
            "/api/forums/SG",
            &json!({
                "title": "Is the Vios worth it?",
                "content": "Thinking about the 2023 model.",
                "category": "buying-advice",
                "tags": ["toyota", "sedan"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let thread = body_json(response).await;
    let thread_id = thread["id"].as_str().unwrap().to_string();
    assert_eq!(thread["postCount"], 0);

    // List shows it, scoped by country.
    let response = app.clone().oneshot(get("/api/forums/SG")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["threads"][0]["id"], thread_id.as_str());

    let response = app.clone().oneshot(get("/api/forums/CA")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 0);

    // Detail carries its own cache policy.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/forums/SG/{thread_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, s-maxage=30, stale-while-revalidate=60"
    );
    let body = body_json(response).await;
    assert_eq!(body["thread"]["id"], thread_id.as_str());
    assert_eq!(body["totalPosts"], 0);

    // Reply.
    let response = app
        .clone()
        .oneshot(post_json_authed(
            &format!("/api/forums/SG/{thread_id}"),
            &json!({ "content": "Yes, fuel economy is great." }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/forums/SG/{thread_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totalPosts"], 1);
    assert_eq!(body["thread"]["postCount"], 1);

    // Empty reply is rejected.
    let response = app
        .oneshot(post_json_authed(
            &format!("/api/forums/SG/{thread_id}"),
            &json!({ "content": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replying_to_a_missing_thread_is_404() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json_authed(
            "/api/forums/SG/thread_does_not_exist",
            &json!({ "content": "hello?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Thread not found");
}

#[tokio::test]
async fn locked_thread_rejects_new_posts() {
    let (app, state) = spawn_app().await;
    state
        .store()
        .insert_thread(&seed_thread("thread_locked", true))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json_authed(
            "/api/forums/SG/thread_locked",
            &json!({ "content": "late take" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Thread is locked");
}

#[tokio::test]
async fn replying_to_a_missing_parent_is_404() {
    let (app, state) = spawn_app().await;
    state
        .store()
        .insert_thread(&seed_thread("thread_open", false))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json_authed(
            "/api/forums/SG/thread_open",
            &json!({ "content": "quoting nothing", "parentId": "post_missing" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Parent post not found");
}

#[tokio::test]
async fn thread_detail_counts_the_current_view() {
    let (app, state) = spawn_app().await;
    state
        .store()
        .insert_thread(&seed_thread("thread_views", false))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/forums/SG/thread_views"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["thread"]["viewCount"], 1);

    let response = app
        .oneshot(get("/api/forums/SG/thread_views"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["thread"]["viewCount"], 2);
}

#[tokio::test]
async fn reply_from_another_user_notifies_the_thread_author() {
    const REPLIER_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    let (app, state) = spawn_app().await;
    seed_user(&state, "bramv", REPLIER_KEY).await;

    // Admin opens a thread and replies to themselves: no notification.
    let response = app
        .clone()
        .oneshot(post_json_authed(
            "/api/forums/SG",
            &json!({
                "title": "COE renewal experiences",
                "content": "How did your renewal go?",
                "category": "general",
            }),
        ))
        .await
        .unwrap();
    let thread = body_json(response).await;
    let thread_id = thread["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(post_json_authed(
            &format!("/api/forums/SG/{thread_id}"),
            &json!({ "content": "Bumping my own thread." }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_authed("/api/notifications/unread-count"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 0);

    // A different user replying does notify the author.
    let response = app
        .clone()
        .oneshot(post_json_with_key(
            &format!("/api/forums/SG/{thread_id}"),
            REPLIER_KEY,
            &json!({ "content": "Renewed last month, smooth process." }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_authed("/api/notifications"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let notifications = body.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "reply");
    assert_eq!(notifications[0]["title"], "New reply from bramv");
    assert_eq!(notifications[0]["body"], "Renewed last month, smooth process.");
    assert!(
        notifications[0]["link"]
            .as_str()
            .unwrap()
            .contains(&thread_id)
    );

    // Marking it read clears the counter.
    let id = notifications[0]["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/notifications/{id}/read"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_authed("/api/notifications/unread-count"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn checkout_rejects_empty_cart() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json("/api/checkout", &json!({ "cart": [] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Cart is empty");
}

#[tokio::test]
async fn checkout_without_provider_credentials_is_server_error() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json(
            "/api/checkout",
            &json!({ "cart": [{ "name": "Roof rack", "price": 120.0 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn notifications_require_auth() {
    let (app, _state) = spawn_app().await;

    let response = app.oneshot(get("/api/notifications")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn notifications_start_empty() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_authed("/api/notifications"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let response = app
        .oneshot(get_authed("/api/notifications/unread-count"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn marking_a_missing_notification_read_is_404() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/notifications/999/read")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_api_key_for_seeded_admin() {
    let (app, _state) = spawn_app().await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "username": "admin", "password": "password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["apiKey"], DEFAULT_API_KEY);
}

#[tokio::test]
async fn regenerating_the_api_key_invalidates_the_old_one() {
    let (app, state) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/api-key/regenerate")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let new_key = body["apiKey"].as_str().unwrap();
    assert_ne!(new_key, DEFAULT_API_KEY);
    assert_eq!(new_key.len(), 64);

    let old = state.store().verify_api_key(DEFAULT_API_KEY).await.unwrap();
    assert!(old.is_none());
    let fresh = state.store().verify_api_key(new_key).await.unwrap();
    assert_eq!(fresh.unwrap().username, "admin");
}

#[tokio::test]
async fn system_status_reports_inventory() {
    let (app, _state) = spawn_seeded_app().await;

    let response = app.oneshot(get("/api/system/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["database"], "ok");
    assert_eq!(body["listings"], sample_listings().len());
}

#[tokio::test]
async fn metrics_endpoint_is_404_without_an_exporter() {
    let (app, _state) = spawn_app().await;

    let response = app.oneshot(get("/api/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sample_source_serves_searches_without_a_seeded_db() {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.marketplace.sample_data = true;

    let state = api::create_app_state_from_config(config, None)
        .await
        .unwrap();
    let app = create_app(state).await;

    let response = app.oneshot(get("/api/listings/TH")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["total"].as_u64().unwrap() > 0);
}
