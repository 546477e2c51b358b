//! # App Configuration
//!
//! Deployment settings for the configurator: default VAT, the price list,
//! promo codes, and where leads go.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RADIOSYNC_VAT_RATE=20                                              │
//! │     RADIOSYNC_VAT_INCLUDED=true                                        │
//! │     RADIOSYNC_DELIVERY_ZONE=rf                                         │
//! │     RADIOSYNC_WEBHOOK_URL=https://hooks.example.ru/lead                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $RADIOSYNC_CONFIG, or                                              │
//! │     ~/.config/radiosync/configurator.toml (Linux)                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     20 % VAT on top, Moscow, standard catalog and promo codes          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! vat_rate = 20.0
//! vat_included = false
//! delivery_zone = "moscow"
//!
//! [submission]
//! webhook_url = "https://hooks.example.ru/lead"
//! max_attempts = 5
//!
//! [[promo]]
//! code = "SPRING"
//! kind = "percent"
//! rate_bps = 700
//!
//! # Optional: replaces the built-in price list entirely
//! # [catalog]
//! # ...
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use radiosync_core::promo::PromoEntry;
use radiosync_core::validation::{clamp_vat_percent, validate_webhook_url_present};
use radiosync_core::{Catalog, CoreError, DeliveryZone, PromoTable, ValidationError, VatRate};

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading the app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The webhook URL is unusable.
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    /// Catalog or promo table rejected.
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Defaults applied to every new configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// VAT percentage (0-100).
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,

    /// Whether catalog prices already include VAT.
    #[serde(default)]
    pub vat_included: bool,

    #[serde(default)]
    pub delivery_zone: DeliveryZone,
}

fn default_vat_rate() -> f64 {
    20.0
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            vat_rate: default_vat_rate(),
            vat_included: false,
            delivery_zone: DeliveryZone::default(),
        }
    }
}

impl PricingSettings {
    /// The configured VAT rate, clamped to [0, 100].
    pub fn vat(&self) -> ConfigResult<VatRate> {
        clamp_vat_percent(self.vat_rate).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Where orders and leads go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSettings {
    /// Webhook pre-filled in the lead dialog.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Delivery attempts before a failed submission is dropped.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    crate::state::DEFAULT_MAX_ATTEMPTS
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        SubmissionSettings {
            webhook_url: None,
            max_attempts: default_max_attempts(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configurator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub submission: SubmissionSettings,

    /// Full price list. `None` means the built-in one.
    #[serde(default)]
    pub catalog: Option<Catalog>,

    /// Promo codes. Empty means the built-in ones.
    #[serde(default, rename = "promo")]
    pub promos: Vec<PromoEntry>,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, `RADIOSYNC_CONFIG`, or platform dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("RADIOSYNC_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading configurator config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.pricing.vat_rate.is_finite() || !(0.0..=100.0).contains(&self.pricing.vat_rate) {
            return Err(ConfigError::Invalid(format!(
                "vat_rate must be between 0 and 100, got {}",
                self.pricing.vat_rate
            )));
        }

        if self.submission.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be greater than 0".into(),
            ));
        }

        if let Some(ref raw) = self.submission.webhook_url {
            parse_webhook_url(raw).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        }

        if let Some(ref catalog) = self.catalog {
            catalog.validate()?;
        }

        // Duplicates and bad amounts surface here rather than at first use.
        self.promo_table()?;

        Ok(())
    }

    /// The price list in effect.
    pub fn catalog(&self) -> Catalog {
        self.catalog.clone().unwrap_or_else(Catalog::standard)
    }

    /// The promo table in effect.
    pub fn promo_table(&self) -> ConfigResult<PromoTable> {
        if self.promos.is_empty() {
            return Ok(PromoTable::standard());
        }
        Ok(PromoTable::from_entries(self.promos.iter().cloned())?)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("RADIOSYNC_VAT_RATE") {
            match rate.trim().replace(',', ".").parse::<f64>() {
                Ok(parsed) => {
                    debug!(vat_rate = parsed, "Overriding VAT rate from environment");
                    self.pricing.vat_rate = parsed;
                }
                Err(_) => warn!(value = %rate, "Ignoring unparsable RADIOSYNC_VAT_RATE"),
            }
        }

        if let Some(included) = lookup("RADIOSYNC_VAT_INCLUDED") {
            match included.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.pricing.vat_included = true,
                "0" | "false" | "no" => self.pricing.vat_included = false,
                _ => warn!(value = %included, "Ignoring unparsable RADIOSYNC_VAT_INCLUDED"),
            }
        }

        if let Some(zone) = lookup("RADIOSYNC_DELIVERY_ZONE") {
            match zone.parse::<DeliveryZone>() {
                Ok(parsed) => self.pricing.delivery_zone = parsed,
                Err(_) => warn!(value = %zone, "Unknown delivery zone in environment"),
            }
        }

        if let Some(url) = lookup("RADIOSYNC_WEBHOOK_URL") {
            debug!(url = %url, "Overriding webhook URL from environment");
            self.submission.webhook_url = Some(url);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ru", "radiosync", "configurator")
            .map(|dirs| dirs.config_dir().join("configurator.toml"))
    }
}

// =============================================================================
// Webhook URL
// =============================================================================

/// Parses a webhook URL typed by the user.
///
/// ## Rules
/// - Required (after trimming)
/// - Must parse as an absolute URL
/// - Scheme must be `http` or `https`
pub fn parse_webhook_url(raw: &str) -> Result<Url, ValidationError> {
    validate_webhook_url_present(raw)?;

    let url = Url::parse(raw.trim()).map_err(|e| ValidationError::InvalidFormat {
        field: "webhook_url".to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::InvalidFormat {
            field: "webhook_url".to_string(),
            reason: format!("scheme must be http or https, got {}", other),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use radiosync_core::Money;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pricing.vat().unwrap(), VatRate::from_percent(20));
        assert_eq!(config.catalog(), Catalog::standard());
        assert_eq!(config.promo_table().unwrap(), PromoTable::standard());
    }

    #[test]
    fn test_parse_toml() {
        let config = AppConfig::from_toml(
            r#"
            [pricing]
            vat_rate = 10.5
            vat_included = true
            delivery_zone = "rf"

            [submission]
            webhook_url = "https://hooks.example.ru/lead"

            [[promo]]
            code = "spring"
            kind = "percent"
            rate_bps = 700

            [[promo]]
            code = "GIFT"
            kind = "fixed"
            amount = 50000
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.pricing.vat().unwrap().bps(), 1_050);
        assert!(config.pricing.vat_included);
        assert_eq!(config.pricing.delivery_zone, DeliveryZone::Rf);
        assert_eq!(config.submission.max_attempts, 5);

        let promos = config.promo_table().unwrap();
        assert_eq!(promos.len(), 2);
        let (_, gift) = promos.lookup("gift").unwrap();
        assert_eq!(gift.amount_on(Money::from_rubles(10_000)), Money::from_rubles(500));
        assert!(promos.lookup("RADIO10").is_none());
    }

    #[test]
    fn test_catalog_round_trips_through_toml() {
        let config = AppConfig {
            catalog: Some(Catalog::standard()),
            ..AppConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.catalog(), Catalog::standard());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.pricing.vat_rate = 120.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.submission.webhook_url = Some("ftp://example.ru".into());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let mut config = AppConfig::default();
        config.promos = vec![PromoEntry::percent("A", 100), PromoEntry::percent("a", 200)];
        assert!(matches!(config.validate(), Err(ConfigError::Core(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("RADIOSYNC_VAT_RATE", "12,5"),
            ("RADIOSYNC_VAT_INCLUDED", "yes"),
            ("RADIOSYNC_DELIVERY_ZONE", "world"),
            ("RADIOSYNC_WEBHOOK_URL", "https://hooks.example.ru/x"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.pricing.vat_rate, 12.5);
        assert!(config.pricing.vat_included);
        assert_eq!(config.pricing.delivery_zone, DeliveryZone::World);
        assert_eq!(
            config.submission.webhook_url.as_deref(),
            Some("https://hooks.example.ru/x")
        );
    }

    #[test]
    fn test_unparsable_overrides_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "RADIOSYNC_VAT_RATE" => Some("twenty".into()),
            "RADIOSYNC_DELIVERY_ZONE" => Some("mars".into()),
            _ => None,
        });
        assert_eq!(config.pricing, PricingSettings::default());
    }

    #[test]
    fn test_parse_webhook_url() {
        assert!(parse_webhook_url(" https://hooks.example.ru/lead ").is_ok());
        assert!(parse_webhook_url("http://localhost:8080/hook").is_ok());
        assert!(matches!(
            parse_webhook_url("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(parse_webhook_url("not a url").is_err());
        assert!(parse_webhook_url("mailto:sales@example.ru").is_err());
    }
}
