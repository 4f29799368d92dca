use axum::Json;
use axum::extract::State;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::api::types::CheckoutRequest;
use crate::services::{CheckoutError, CheckoutSession};

pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>, ApiError> {
    if request.cart.is_empty() {
        return Err(ApiError::validation("Cart is empty"));
    }

    let session = state
        .checkout()
        .create_session(&request.cart)
        .await
        .map_err(|e| match e {
            CheckoutError::NotConfigured => {
                ApiError::internal(anyhow::anyhow!("Checkout secret key is not configured"))
            }
            CheckoutError::Provider(message) => ApiError::external("checkout", message),
        })?;

    Ok(Json(session))
}
