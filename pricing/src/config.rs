//! Pricing configuration.

use bookstore_common::BookstoreError;
use bookstore_fx::RateSourceConfig;

/// Margin applied when none is configured.
pub const DEFAULT_PROFIT_MARGIN_PERCENTAGE: u32 = 40;

/// Main pricing configuration.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Profit margin as a whole percentage, e.g. 40 for 40%.
    pub profit_margin_percentage: u32,
    /// Rate source and fallback.
    pub rate_source: RateSourceConfig,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            profit_margin_percentage: DEFAULT_PROFIT_MARGIN_PERCENTAGE,
            rate_source: RateSourceConfig::default(),
        }
    }
}

impl PricingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, BookstoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BookstoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            rate_source: RateSourceConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(margin) = lookup("PROFIT_MARGIN_PERCENTAGE") {
            config.profit_margin_percentage = margin.trim().parse().map_err(|_| {
                BookstoreError::Configuration(format!(
                    "PROFIT_MARGIN_PERCENTAGE must be a non-negative integer, got '{}'",
                    margin
                ))
            })?;
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), BookstoreError> {
        self.rate_source.validate()
    }
}
