use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::info;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::types::{ChangePasswordRequest, LoginRequest};
use crate::db::User;

const SESSION_USER_KEY: &str = "user";

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        return Some(key.to_string());
    }

    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

async fn session_username(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_USER_KEY).await.ok().flatten()
}

/// Resolves the calling user from the session cookie or an API key.
/// Write endpoints call this instead of relying on a router-wide layer,
/// so read endpoints stay anonymous.
pub async fn require_user(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    if let Some(username) = session_username(session).await
        && let Some(user) = state.store().get_user_by_username(&username).await?
    {
        return Ok(user);
    }

    if let Some(key) = extract_api_key(headers)
        && let Some(user) = state.store().verify_api_key(&key).await?
    {
        return Ok(user);
    }

    Err(ApiError::unauthorized("Authentication required"))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let valid = state
        .store()
        .verify_user_password(&request.username, &request.password)
        .await?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let user = state
        .store()
        .get_user_by_username(&request.username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    session
        .insert(SESSION_USER_KEY, user.username.clone())
        .await
        .map_err(|e| ApiError::internal(anyhow::anyhow!("Failed to persist session: {e}")))?;

    info!("User '{}' logged in", user.username);

    Ok(Json(json!({
        "username": user.username,
        "apiKey": user.api_key,
    })))
}

pub async fn logout(session: Session) -> Result<Json<Value>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(anyhow::anyhow!("Failed to clear session: {e}")))?;

    Ok(Json(json!({ "success": true })))
}

pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &session, &headers).await?;

    if request.new_password.len() < 8 {
        return Err(ApiError::validation(
            "New password must be at least 8 characters",
        ));
    }

    let valid = state
        .store()
        .verify_user_password(&user.username, &request.current_password)
        .await?;
    if !valid {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    state
        .store()
        .update_user_password(&user.username, &request.new_password)
        .await?;

    info!("User '{}' changed their password", user.username);

    Ok(Json(json!({ "success": true })))
}

pub async fn regenerate_api_key(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &session, &headers).await?;
    let api_key = state
        .store()
        .regenerate_user_api_key(&user.username)
        .await?;

    info!("User '{}' regenerated their API key", user.username);

    Ok(Json(json!({ "apiKey": api_key })))
}
