//! Traits for storage abstraction and external collaborators

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for bills, rates and owner payout settings
///
/// The engine reads everything through this trait so it can sit on top of
/// any backend (a REST API client, PostgreSQL, in-memory, etc.).
#[async_trait]
pub trait BillingStorage: Send + Sync {
    /// Save a new bill
    async fn save_bill(&mut self, bill: &Bill) -> BillingResult<()>;

    /// Get a bill by ID
    async fn get_bill(&self, bill_id: &str) -> BillingResult<Option<Bill>>;

    /// Replace an existing bill
    async fn update_bill(&mut self, bill: &Bill) -> BillingResult<()>;

    /// All bills assigned to a renter, in storage order
    async fn list_renter_bills(&self, renter_id: &str) -> BillingResult<Vec<Bill>>;

    /// Current exchange-rate snapshot
    async fn exchange_rates(&self) -> BillingResult<ExchangeRateTable>;

    /// Payout settings of the owner of a property
    async fn owner_payout_profile(
        &self,
        property_id: &str,
    ) -> BillingResult<Option<OwnerPayoutProfile>>;
}

/// Service that reads bill fields out of an uploaded document
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Extract candidate bill fields for a property from raw document bytes
    async fn extract(
        &self,
        property_id: &str,
        document: &[u8],
    ) -> BillingResult<ExtractionResult>;
}

/// Trait for implementing custom bill validation rules
pub trait BillValidator: Send + Sync {
    /// Validate a bill before saving
    fn validate_bill(&self, bill: &Bill) -> BillingResult<()>;
}

/// Default bill validator with basic rules
pub struct DefaultBillValidator;

impl BillValidator for DefaultBillValidator {
    fn validate_bill(&self, bill: &Bill) -> BillingResult<()> {
        if bill.id.trim().is_empty() {
            return Err(BillingError::Validation(
                "Bill ID cannot be empty".to_string(),
            ));
        }

        if bill.currency.trim().is_empty() {
            return Err(BillingError::Validation(
                "Bill currency cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
