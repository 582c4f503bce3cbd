//! Main engine that orchestrates bill intake, statements and payment routing

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::extraction::{
    bill_from_extraction, AcceptExtractionParams, ExtractionReview, ExtractionReviewer,
};
use crate::routing::{PaymentInstructions, PaymentRouteResolver};
use crate::statement::{BalanceAggregator, BalanceSummary, BillGroupingEngine};
use crate::traits::*;
use crate::types::*;

/// Everything shown on a renter's statement, computed from one rates snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenterStatement {
    pub renter_id: String,
    pub groups: Vec<BillGroup>,
    pub balance: BalanceSummary,
    /// Rates the statement was computed with, reused for the rest of the session
    pub session: RenterBalance,
}

/// Bill reconciliation and payment routing engine
pub struct ReconciliationEngine<S: BillingStorage> {
    storage: S,
    config: EngineConfig,
    reviewer: ExtractionReviewer,
    grouping: BillGroupingEngine,
    aggregator: BalanceAggregator,
    resolver: PaymentRouteResolver,
    validator: Box<dyn BillValidator>,
}

impl<S: BillingStorage> ReconciliationEngine<S> {
    /// Create a new engine with the default configuration
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, EngineConfig::default())
    }

    /// Create a new engine with a custom configuration
    pub fn with_config(storage: S, config: EngineConfig) -> Self {
        Self::with_validator(storage, config, Box::new(DefaultBillValidator))
    }

    /// Create a new engine with a custom configuration and bill validator
    pub fn with_validator(
        storage: S,
        config: EngineConfig,
        validator: Box<dyn BillValidator>,
    ) -> Self {
        Self {
            reviewer: ExtractionReviewer::from_config(&config),
            grouping: BillGroupingEngine::new(),
            aggregator: BalanceAggregator::from_config(&config),
            resolver: PaymentRouteResolver::from_config(&config),
            validator,
            config,
            storage,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // Intake
    /// Score an extraction before the user confirms it
    pub fn review_extraction(&self, result: &ExtractionResult) -> ExtractionReview {
        self.reviewer.review(result)
    }

    /// Run a document through an extraction service and review the result
    pub async fn extract_and_review<E: ExtractionService + ?Sized>(
        &self,
        service: &E,
        property_id: &str,
        document: &[u8],
    ) -> BillingResult<(ExtractionResult, ExtractionReview)> {
        let result = service.extract(property_id, document).await?;
        let review = self.review_extraction(&result);
        tracing::debug!(
            property_id,
            percentage = review.score.percentage,
            level = ?review.level,
            "extraction reviewed"
        );
        Ok((result, review))
    }

    /// Turn a confirmed extraction into a stored bill
    pub async fn accept_extraction(
        &mut self,
        result: &ExtractionResult,
        params: AcceptExtractionParams,
    ) -> BillingResult<Bill> {
        let bill = bill_from_extraction(result, params)?;
        self.add_bill(&bill).await?;
        Ok(bill)
    }

    /// Validate and store a bill
    pub async fn add_bill(&mut self, bill: &Bill) -> BillingResult<()> {
        self.validator.validate_bill(bill)?;

        if self.storage.get_bill(&bill.id).await?.is_some() {
            return Err(BillingError::Validation(format!(
                "Bill with ID '{}' already exists",
                bill.id
            )));
        }

        self.storage.save_bill(bill).await?;
        tracing::info!(bill_id = %bill.id, property_id = %bill.property_id, "bill added");
        Ok(())
    }

    // Lifecycle
    /// Get a bill by ID, returning an error if not found
    pub async fn get_bill_required(&self, bill_id: &str) -> BillingResult<Bill> {
        self.storage
            .get_bill(bill_id)
            .await?
            .ok_or_else(|| BillingError::BillNotFound(bill_id.to_string()))
    }

    pub async fn mark_paid(&mut self, bill_id: &str) -> BillingResult<Bill> {
        self.transition(bill_id, BillStatus::Paid).await
    }

    pub async fn mark_overdue(&mut self, bill_id: &str) -> BillingResult<Bill> {
        self.transition(bill_id, BillStatus::Overdue).await
    }

    async fn transition(&mut self, bill_id: &str, next: BillStatus) -> BillingResult<Bill> {
        let mut bill = self.get_bill_required(bill_id).await?;
        let previous = bill.status;
        bill.transition(next)?;
        self.storage.update_bill(&bill).await?;
        tracing::info!(bill_id, from = %previous, to = %next, "bill status changed");
        Ok(bill)
    }

    // Statements
    /// Grouped bills and balance totals for a renter
    pub async fn renter_statement(
        &self,
        renter_id: &str,
        period: BillingPeriod,
    ) -> BillingResult<RenterStatement> {
        let bills = self.storage.list_renter_bills(renter_id).await?;
        let rates = self.storage.exchange_rates().await?;

        let groups = self.grouping.group(&bills);
        let balance = self.aggregator.aggregate(&bills, &rates, period);

        tracing::info!(
            renter_id,
            bills = bills.len(),
            groups = groups.len(),
            outstanding = %balance.outstanding_total,
            "renter statement built"
        );

        Ok(RenterStatement {
            renter_id: renter_id.to_string(),
            groups,
            balance,
            session: RenterBalance {
                exchange_rates: rates,
            },
        })
    }

    // Payment routing
    /// How to pay a bill, or `None` when no payment route is available
    pub async fn payment_instructions(
        &self,
        bill_id: &str,
        renter_currency: Option<&str>,
    ) -> BillingResult<Option<PaymentInstructions>> {
        let bill = self.get_bill_required(bill_id).await?;
        let rates = self.storage.exchange_rates().await?;
        let profile = self
            .storage
            .owner_payout_profile(&bill.property_id)
            .await?
            .unwrap_or_default();

        Ok(self
            .resolver
            .instructions(&bill, &profile, renter_currency, &rates))
    }

    /// Same as [`payment_instructions`](Self::payment_instructions) but using
    /// a rates snapshot the caller already holds (e.g. from a statement)
    pub async fn payment_instructions_with_rates(
        &self,
        bill_id: &str,
        renter_currency: Option<&str>,
        session: &RenterBalance,
    ) -> BillingResult<Option<PaymentInstructions>> {
        let bill = self.get_bill_required(bill_id).await?;
        let profile = self
            .storage
            .owner_payout_profile(&bill.property_id)
            .await?
            .unwrap_or_default();

        Ok(self.resolver.instructions(
            &bill,
            &profile,
            renter_currency,
            &session.exchange_rates,
        ))
    }
}
