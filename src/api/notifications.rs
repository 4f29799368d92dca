use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::api::AppState;
use crate::api::auth::require_user;
use crate::api::error::ApiError;
use crate::models::notification::Notification;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unread_only: Option<bool>,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let user = require_user(&state, &session, &headers).await?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0);
    let unread_only = query.unread_only.unwrap_or(false);

    let notifications = state
        .notifications()
        .list(user.id, limit, offset, unread_only)
        .await?;

    Ok(Json(notifications))
}

pub async fn unread_count(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &session, &headers).await?;
    let count = state.notifications().unread_count(user.id).await?;

    Ok(Json(json!({ "count": count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &session, &headers).await?;

    let updated = state.notifications().mark_read(id, user.id).await?;
    if !updated {
        return Err(ApiError::not_found("Notification not found"));
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &session, &headers).await?;
    let updated = state.notifications().mark_all_read(user.id).await?;

    Ok(Json(json!({ "updated": updated })))
}
