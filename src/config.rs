//! Engine configuration

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Currency every balance is reported in
pub const DEFAULT_PIVOT_CURRENCY: &str = "RON";

/// Rate assumed for the pivot currency when a rates snapshot omits it.
/// Historical statements were computed with this value; keep it stable.
pub const DEFAULT_PIVOT_FALLBACK_RATE: &str = "4.97";

/// Settlement currency for rent when a property has none configured
pub const DEFAULT_SETTLEMENT_CURRENCY: &str = "EUR";

/// Tunables shared by the scoring, conversion and routing components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub pivot_currency: String,
    pub pivot_fallback_rate: BigDecimal,
    pub default_settlement_currency: String,
    /// Scores strictly below this are low confidence
    pub low_confidence_below: u8,
    /// Scores at or above this are high confidence
    pub high_confidence_from: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pivot_currency: DEFAULT_PIVOT_CURRENCY.to_string(),
            pivot_fallback_rate: default_fallback_rate(),
            default_settlement_currency: DEFAULT_SETTLEMENT_CURRENCY.to_string(),
            low_confidence_below: 30,
            high_confidence_from: 75,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `BILLING_*` environment variables, keeping
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pivot_currency: env_string("BILLING_PIVOT_CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or(defaults.pivot_currency),
            pivot_fallback_rate: env_parsed("BILLING_PIVOT_FALLBACK_RATE")
                .unwrap_or(defaults.pivot_fallback_rate),
            default_settlement_currency: env_string("BILLING_DEFAULT_SETTLEMENT_CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or(defaults.default_settlement_currency),
            low_confidence_below: env_parsed("BILLING_LOW_CONFIDENCE_BELOW")
                .unwrap_or(defaults.low_confidence_below),
            high_confidence_from: env_parsed("BILLING_HIGH_CONFIDENCE_FROM")
                .unwrap_or(defaults.high_confidence_from),
        }
    }
}

fn default_fallback_rate() -> BigDecimal {
    BigDecimal::from_str(DEFAULT_PIVOT_FALLBACK_RATE).unwrap_or_else(|_| BigDecimal::from(1))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.pivot_currency, "RON");
        assert_eq!(
            config.pivot_fallback_rate,
            BigDecimal::from_str("4.97").unwrap()
        );
        assert_eq!(config.default_settlement_currency, "EUR");
        assert_eq!(config.low_confidence_below, 30);
        assert_eq!(config.high_confidence_from, 75);
    }

    #[test]
    fn test_from_env_overrides_and_fallbacks() {
        std::env::set_var("BILLING_DEFAULT_SETTLEMENT_CURRENCY", "usd");
        std::env::set_var("BILLING_HIGH_CONFIDENCE_FROM", "not-a-number");

        let config = EngineConfig::from_env();
        assert_eq!(config.default_settlement_currency, "USD");
        assert_eq!(config.high_confidence_from, 75);

        std::env::remove_var("BILLING_DEFAULT_SETTLEMENT_CURRENCY");
        std::env::remove_var("BILLING_HIGH_CONFIDENCE_FROM");
    }
}
