//! Confidence scoring for extracted bills

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Fields inspected when scoring an extraction
pub const SCORED_FIELDS: u8 = 8;

/// Minimum score once the address contains at least one big token
const ADDRESS_FLOOR: u8 = 25;
/// Bonus per big address token
const TOKEN_BONUS: u8 = 3;
/// Ceiling for the total token bonus
const MAX_TOKEN_BONUS: u8 = 10;
/// Tokens must be longer than this (after stripping punctuation) to count
const BIG_TOKEN_MIN_EXCLUSIVE: usize = 5;

/// How trustworthy an extraction looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    /// 0..=100
    pub percentage: u8,
    pub found: u8,
    pub total: u8,
}

/// Scores an [`ExtractionResult`] by field coverage with an address-quality bonus
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionConfidenceScorer;

impl ExtractionConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, result: &ExtractionResult) -> ConfidenceScore {
        let found = found_fields(result);
        let total = SCORED_FIELDS;

        // Math.round semantics: halves go up
        let base = ((u32::from(found) * 100 + u32::from(total) / 2) / u32::from(total)) as u8;

        let big_tokens = result
            .address
            .as_deref()
            .map(count_big_tokens)
            .unwrap_or(0);

        let percentage = apply_address_bonus(base, big_tokens);

        tracing::debug!(found, total, base, big_tokens, percentage, "scored extraction");

        ConfidenceScore {
            percentage,
            found,
            total,
        }
    }
}

fn found_fields(result: &ExtractionResult) -> u8 {
    let amount_ok = result
        .amount
        .as_ref()
        .is_some_and(|amount| amount > &BigDecimal::zero());

    let checks = [
        amount_ok,
        present(&result.address),
        present(&result.bill_number),
        result.due_date.is_some(),
        result.bill_date.is_some(),
        present(&result.contract_id),
        present(&result.iban),
        present(&result.legal_name),
    ];

    checks.iter().filter(|ok| **ok).count() as u8
}

fn present(value: &Option<String>) -> bool {
    non_empty(value.as_deref()).is_some()
}

/// Floor to 25 first, then add the token bonus, then clamp to 100.
fn apply_address_bonus(base: u8, big_tokens: usize) -> u8 {
    if big_tokens == 0 {
        return base.min(100);
    }
    let floored = base.max(ADDRESS_FLOOR);
    let bonus = big_tokens
        .saturating_mul(usize::from(TOKEN_BONUS))
        .min(usize::from(MAX_TOKEN_BONUS)) as u8;
    floored.saturating_add(bonus).min(100)
}

/// Count address words longer than five alphanumeric characters.
///
/// Words are split on whitespace and dots; other punctuation is stripped
/// before measuring.
pub fn count_big_tokens(address: &str) -> usize {
    address
        .split(|c: char| c.is_whitespace() || c == '.')
        .filter(|token| {
            token.chars().filter(|c| c.is_alphanumeric()).count() > BIG_TOKEN_MIN_EXCLUSIVE
        })
        .count()
}
