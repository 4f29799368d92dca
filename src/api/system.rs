use axum::Json;
use axum::extract::State;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::types::StatusBody;

pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusBody>, ApiError> {
    let database = match state.store().ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {e}"),
    };

    let listings = state.store().listing_count().await.unwrap_or(0);

    Ok(Json(StatusBody {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time().elapsed().as_secs(),
        listings,
        database,
    }))
}
