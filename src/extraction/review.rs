//! Confirm-before-add step: classify an extraction and turn it into a bill

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::extraction::confidence::{ConfidenceScore, ExtractionConfidenceScorer};
use crate::types::*;

/// Coarse confidence band used to flag an extraction in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Outcome of reviewing an extraction before acceptance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReview {
    pub score: ConfidenceScore,
    pub level: ConfidenceLevel,
    pub address_matches: bool,
    pub address_warning: Option<String>,
    /// The user must explicitly confirm before the bill is added
    pub requires_confirmation: bool,
}

/// Scores extractions and classifies them with configurable thresholds
#[derive(Debug, Clone)]
pub struct ExtractionReviewer {
    scorer: ExtractionConfidenceScorer,
    low_below: u8,
    high_from: u8,
}

impl Default for ExtractionReviewer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ExtractionReviewer {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            scorer: ExtractionConfidenceScorer::new(),
            low_below: config.low_confidence_below,
            high_from: config.high_confidence_from,
        }
    }

    pub fn level(&self, percentage: u8) -> ConfidenceLevel {
        if percentage < self.low_below {
            ConfidenceLevel::Low
        } else if percentage < self.high_from {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::High
        }
    }

    pub fn review(&self, result: &ExtractionResult) -> ExtractionReview {
        let score = self.scorer.score(result);
        let level = self.level(score.percentage);
        let requires_confirmation = level == ConfidenceLevel::Low || !result.address_matches;

        ExtractionReview {
            score,
            level,
            address_matches: result.address_matches,
            address_warning: result.address_warning.clone(),
            requires_confirmation,
        }
    }
}

/// Caller-supplied details needed to turn an extraction into a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptExtractionParams {
    pub property_id: String,
    pub renter_id: Option<String>,
    pub description: String,
    pub currency: String,
    /// Overrides the type suggested by the matched supplier pattern
    pub bill_type: Option<BillType>,
}

/// Build a pending bill from an extraction. Amount and due date are required.
pub fn bill_from_extraction(
    result: &ExtractionResult,
    params: AcceptExtractionParams,
) -> BillingResult<Bill> {
    let amount = result
        .amount
        .clone()
        .ok_or_else(|| BillingError::IncompleteExtraction("amount is missing".to_string()))?;
    let due_date = result
        .due_date
        .ok_or_else(|| BillingError::IncompleteExtraction("due date is missing".to_string()))?;

    let bill_type = params.bill_type.unwrap_or_else(|| {
        result
            .matched_pattern_bill_type
            .as_deref()
            .map(BillType::from_label)
            .unwrap_or(BillType::Other)
    });

    let mut bill = Bill::new(
        params.property_id,
        params.description,
        bill_type,
        amount,
        params.currency,
        due_date,
    );
    bill.renter_id = params.renter_id;
    bill.contract_id = owned_non_empty(&result.contract_id);
    bill.bill_number = owned_non_empty(&result.bill_number);
    bill.iban = owned_non_empty(&result.iban);
    bill.legal_name = owned_non_empty(&result.legal_name);

    Ok(bill)
}

fn owned_non_empty(value: &Option<String>) -> Option<String> {
    non_empty(value.as_deref()).map(|v| v.trim().to_string())
}
