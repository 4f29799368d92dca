use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CheckoutConfig;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Checkout is not configured")]
    NotConfigured,

    #[error("Payment provider error: {0}")]
    Provider(String),
}

/// One cart line as submitted by the client. Prices arrive in whole
/// currency units and are converted to minor units for the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub selected_size: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub url: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Thin client for the hosted-checkout API of the payment provider.
/// Session creation is the only call we make; payment processing itself
/// happens entirely on the provider's side.
pub struct CheckoutClient {
    http: reqwest::Client,
    config: CheckoutConfig,
}

impl CheckoutClient {
    pub fn new(config: CheckoutConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.request_timeout_seconds.into(),
            ))
            .user_agent("Motorly/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build checkout HTTP client: {e}"))?;

        Ok(Self { http, config })
    }

    pub async fn create_session(
        &self,
        cart: &[CartItem],
    ) -> Result<CheckoutSession, CheckoutError> {
        if self.config.secret_key.is_empty() {
            return Err(CheckoutError::NotConfigured);
        }

        let params = self.session_params(cart);

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.config.api_base_url))
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let message = response
                .json::<ProviderErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|e| e.to_string());
            return Err(CheckoutError::Provider(message));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::Provider(e.to_string()))?;

        Ok(CheckoutSession {
            url: session.url,
            session_id: session.id,
        })
    }

    fn session_params(&self, cart: &[CartItem]) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "success_url".to_string(),
                self.config.success_url.clone(),
            ),
            ("cancel_url".to_string(), self.config.cancel_url.clone()),
        ];

        for (i, item) in cart.iter().enumerate() {
            let name = item.selected_size.as_ref().map_or_else(
                || item.name.clone(),
                |size| format!("{} ({size})", item.name),
            );

            params.push((
                format!("line_items[{i}][price_data][currency]"),
                self.config.currency.clone(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                name,
            ));
            if let Some(description) = &item.description {
                params.push((
                    format!("line_items[{i}][price_data][product_data][description]"),
                    description.clone(),
                ));
            }
            if let Some(image) = &item.image {
                params.push((
                    format!("line_items[{i}][price_data][product_data][images][0]"),
                    image.clone(),
                ));
            }
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                amount_minor_units(item.price).to_string(),
            ));
            params.push((format!("line_items[{i}][quantity]"), "1".to_string()));
        }

        params
    }
}

/// Whole currency units to minor units (cents), rounded half away from zero.
#[must_use]
pub fn amount_minor_units(price: f64) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    {
        (price * 100.0).round() as i64
    }
}
