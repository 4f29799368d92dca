use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::country::CountryCode;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,
    pub log_level: String,
    /// 0 means let the runtime pick.
    pub worker_threads: usize,
    pub max_db_connections: u32,
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/motorly.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
            max_db_connections: 10,
            min_db_connections: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Empty list allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7878,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub default_country: String,
    pub deals_limit: u64,
    /// Serve the built-in sample inventory instead of the database.
    pub sample_data: bool,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            default_country: "SG".to_string(),
            deals_limit: 6,
            sample_data: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub api_base_url: String,
    pub secret_key: String,
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
    pub request_timeout_seconds: u32,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.stripe.com".to_string(),
            secret_key: String::new(),
            success_url: "http://localhost:3000/checkout/success".to_string(),
            cancel_url: "http://localhost:3000/checkout/cancel".to_string(),
            currency: "cad".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
    pub loki_enabled: bool,
    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    /// Candidate config locations, highest priority first.
    #[must_use]
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("motorly.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("motorly").join("config.toml"));
        }

        paths.push(PathBuf::from("/etc/motorly/config.toml"));
        paths
    }

    /// Loads the first config file that exists, or defaults when none do.
    pub fn load() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn load_from_path(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Writes a default config to the user config dir unless one already
    /// exists anywhere on the search path. Returns the written path.
    pub fn create_default_if_missing() -> Result<Option<PathBuf>> {
        if Self::config_paths().iter().any(|p| p.exists()) {
            return Ok(None);
        }

        let Some(config_dir) = dirs::config_dir() else {
            anyhow::bail!("Could not determine the user config directory");
        };
        let path = config_dir.join("motorly").join("config.toml");
        Self::default().save(&path)?;
        Ok(Some(path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("general.database_path must not be empty");
        }
        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections exceeds max_db_connections");
        }
        if CountryCode::parse(&self.marketplace.default_country).is_none() {
            anyhow::bail!(
                "marketplace.default_country '{}' is not a supported market",
                self.marketplace.default_country
            );
        }
        if self.marketplace.deals_limit == 0 {
            anyhow::bail!("marketplace.deals_limit must be at least 1");
        }
        if self.checkout.api_base_url.is_empty() {
            anyhow::bail!("checkout.api_base_url must not be empty");
        }
        url::Url::parse(&self.checkout.api_base_url)
            .context("checkout.api_base_url is not a valid URL")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [marketplace]
            default_country = "MY"
            "#,
        )
        .unwrap();

        assert_eq!(config.marketplace.default_country, "MY");
        assert_eq!(config.marketplace.deals_limit, 6);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_validate_rejects_unknown_default_country() {
        let mut config = Config::default();
        config.marketplace.default_country = "XX".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_checkout_url() {
        let mut config = Config::default();
        config.checkout.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.general.database_path, config.general.database_path);
        assert_eq!(parsed.checkout.currency, config.checkout.currency);
    }
}
