use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::AppState;
use crate::api::auth::require_user;
use crate::api::error::ApiError;
use crate::api::types::{CreatePostRequest, CreateThreadRequest, ThreadDetailBody, ThreadPageBody};
use crate::api::validation::{validate_country, validate_pagination};
use crate::services::{ForumError, NewPost, NewThread};

/// Thread detail caches briefly; view counts make it more volatile than
/// listing search.
const THREAD_CACHE_CONTROL: &str = "public, s-maxage=30, stale-while-revalidate=60";

#[derive(Debug, Default, Deserialize)]
pub struct ThreadListQuery {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_threads(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(query): Query<ThreadListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let country = validate_country(&country)?;
    let pagination = validate_pagination(query.page.as_deref(), query.limit.as_deref());

    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let page = state
        .forums()
        .list_threads(country, category, pagination.page, pagination.limit)
        .await?;

    Ok(Json(ThreadPageBody::from(page)))
}

pub async fn create_thread(
    State(state): State<AppState>,
    Path(country): Path<String>,
    session: Session,
    headers: HeaderMap,
    Json(request): Json<CreateThreadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let country = validate_country(&country)?;
    let user = require_user(&state, &session, &headers).await?;

    let (Some(title), Some(content), Some(category)) = (
        request.title.filter(|t| !t.trim().is_empty()),
        request.content.filter(|c| !c.trim().is_empty()),
        request.category.filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Title, content, and category are required",
        ));
    };

    let thread = state
        .forums()
        .create_thread(
            country,
            &user,
            NewThread {
                title,
                content,
                category,
                tags: request.tags,
                listing_id: request.listing_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(thread)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ThreadDetailQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn get_thread(
    State(state): State<AppState>,
    Path((country, thread_id)): Path<(String, String)>,
    Query(query): Query<ThreadDetailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let country = validate_country(&country)?;
    let pagination = validate_pagination(query.page.as_deref(), query.limit.as_deref());

    let (thread, posts) = state
        .forums()
        .thread_with_posts(country, &thread_id, pagination.page, pagination.limit)
        .await?
        .ok_or_else(|| ApiError::not_found("Thread not found"))?;

    let body = ThreadDetailBody {
        thread,
        total_posts: posts.total,
        page: posts.page,
        limit: posts.limit,
        total_pages: posts.total_pages,
        posts: posts.items,
    };

    Ok((
        [(header::CACHE_CONTROL, THREAD_CACHE_CONTROL)],
        Json(body),
    ))
}

pub async fn create_post(
    State(state): State<AppState>,
    Path((country, thread_id)): Path<(String, String)>,
    session: Session,
    headers: HeaderMap,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let country = validate_country(&country)?;
    let user = require_user(&state, &session, &headers).await?;

    let Some(content) = request.content.filter(|c| !c.trim().is_empty()) else {
        return Err(ApiError::validation("Content is required"));
    };

    let post = state
        .forums()
        .create_post(
            country,
            &thread_id,
            &user,
            NewPost {
                content,
                parent_id: request.parent_id,
            },
        )
        .await
        .map_err(|e| match e {
            ForumError::ThreadNotFound => ApiError::not_found("Thread not found"),
            ForumError::ParentNotFound => ApiError::not_found("Parent post not found"),
            ForumError::ThreadLocked => ApiError::forbidden("Thread is locked"),
            ForumError::Database(err) => ApiError::Database(err),
        })?;

    Ok((StatusCode::CREATED, Json(post)))
}
