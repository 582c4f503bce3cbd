//! Pivot-rate currency converter
//!
//! Every rate in an [`ExchangeRateTable`] is expressed against the same base,
//! so a cross rate is `rate(to) / rate(from)`. Missing rates never fail a
//! conversion: they default to `1`, trading precision for availability.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::*;

/// Converts amounts between currencies using a rates snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConverter {
    pivot_currency: String,
    pivot_fallback_rate: BigDecimal,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl CurrencyConverter {
    /// Create a converter for the given pivot currency and its fallback rate
    pub fn new(pivot_currency: &str, pivot_fallback_rate: BigDecimal) -> Self {
        Self {
            pivot_currency: pivot_currency.to_uppercase(),
            pivot_fallback_rate,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.pivot_currency, config.pivot_fallback_rate.clone())
    }

    pub fn pivot_currency(&self) -> &str {
        &self.pivot_currency
    }

    /// Convert `amount` from one currency to another.
    ///
    /// Identical currencies return the amount untouched without consulting
    /// the table.
    pub fn convert(
        &self,
        amount: &BigDecimal,
        from_currency: &str,
        to_currency: &str,
        rates: &ExchangeRateTable,
    ) -> BigDecimal {
        convert(amount, from_currency, to_currency, rates)
    }

    /// Convert `amount` into the pivot currency.
    ///
    /// The pivot's own rate falls back to the configured constant (4.97 by
    /// default) rather than `1` when the snapshot omits it.
    pub fn to_pivot(
        &self,
        amount: &BigDecimal,
        currency: &str,
        rates: &ExchangeRateTable,
    ) -> BigDecimal {
        if same_currency(currency, &self.pivot_currency) {
            return amount.clone();
        }
        let pivot_rate = rates
            .get(&self.pivot_currency)
            .cloned()
            .unwrap_or_else(|| self.pivot_fallback_rate.clone());
        amount * pivot_rate / rates.rate(currency)
    }

    /// Same as [`to_pivot`](Self::to_pivot), tagged with the pivot currency
    pub fn pivot_amount(
        &self,
        amount: &BigDecimal,
        currency: &str,
        rates: &ExchangeRateTable,
    ) -> CurrencyAmount {
        CurrencyAmount::new(&self.pivot_currency, self.to_pivot(amount, currency, rates))
    }
}

/// Convert using `amount * rate(to) / rate(from)`, defaulting absent rates to 1
pub fn convert(
    amount: &BigDecimal,
    from_currency: &str,
    to_currency: &str,
    rates: &ExchangeRateTable,
) -> BigDecimal {
    if same_currency(from_currency, to_currency) {
        return amount.clone();
    }
    amount * rates.rate(to_currency) / rates.rate(from_currency)
}

/// Round a converted amount to cents for display
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.round(2)
}

fn same_currency(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
