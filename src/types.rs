//! Core types and data structures for rental billing

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of charge a bill represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    /// Rent owed to the property owner
    Rent,
    /// Metered utilities (electricity, gas, water, building maintenance)
    Utilities,
    /// Internet, phone, TV
    Telecom,
    /// Home insurance
    Insurance,
    /// Anything else
    #[serde(other)]
    Other,
}

impl BillType {
    /// Parse a loosely formatted bill type label, as produced by extraction patterns
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "rent" => BillType::Rent,
            "utilities" | "utility" => BillType::Utilities,
            "telecom" | "internet" | "phone" => BillType::Telecom,
            "insurance" => BillType::Insurance,
            _ => BillType::Other,
        }
    }
}

/// Settlement state of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Paid,
    Overdue,
}

impl BillStatus {
    /// Allowed moves: pending -> paid, pending -> overdue, overdue -> paid.
    pub fn can_transition_to(&self, next: BillStatus) -> bool {
        matches!(
            (self, next),
            (BillStatus::Pending, BillStatus::Paid)
                | (BillStatus::Pending, BillStatus::Overdue)
                | (BillStatus::Overdue, BillStatus::Paid)
        )
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillStatus::Pending => "pending",
            BillStatus::Paid => "paid",
            BillStatus::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

/// Supplier-specific payment details attached to a bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Client code the supplier expects as a secondary payment reference
    pub client_code: Option<String>,
}

/// A bill issued for a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier for the bill
    pub id: String,
    /// Property the bill belongs to
    pub property_id: String,
    /// Renter responsible for the bill, if assigned
    pub renter_id: Option<String>,
    /// Human-readable description ("March Rent", "Water")
    pub description: String,
    pub bill_type: BillType,
    /// Amount at issuance, in `currency`
    pub amount: BigDecimal,
    /// ISO-4217 currency code
    pub currency: String,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub contract_id: Option<String>,
    pub bill_number: Option<String>,
    /// Supplier IBAN for bills settled directly with the supplier
    pub iban: Option<String>,
    /// Supplier legal name, used as beneficiary
    pub legal_name: Option<String>,
    pub payment_details: Option<PaymentDetails>,
    /// Paid by the owner on the renter's behalf, so routed like rent
    #[serde(default)]
    pub is_direct_debit: bool,
    /// Outstanding amount after confirmed partial payments, supplied by the bill store
    #[serde(default)]
    pub remaining: Option<BigDecimal>,
    /// When the bill was created
    pub created_at: NaiveDateTime,
}

impl Bill {
    /// Create a new pending bill with a generated id
    pub fn new(
        property_id: String,
        description: String,
        bill_type: BillType,
        amount: BigDecimal,
        currency: String,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            property_id,
            renter_id: None,
            description,
            bill_type,
            amount,
            currency: currency.to_uppercase(),
            due_date,
            status: BillStatus::Pending,
            contract_id: None,
            bill_number: None,
            iban: None,
            legal_name: None,
            payment_details: None,
            is_direct_debit: false,
            remaining: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// Amount still owed: zero once paid, otherwise the supplied remaining
    /// figure or the full amount, never below zero.
    pub fn remaining_amount(&self) -> BigDecimal {
        if self.is_paid() {
            return BigDecimal::zero();
        }
        let owed = self.remaining.as_ref().unwrap_or(&self.amount);
        if *owed < BigDecimal::zero() {
            BigDecimal::zero()
        } else {
            owed.clone()
        }
    }

    /// Client code from the payment details, if non-empty
    pub fn client_code(&self) -> Option<&str> {
        self.payment_details
            .as_ref()
            .and_then(|details| non_empty(details.client_code.as_deref()))
    }

    /// Move the bill to a new status
    pub fn transition(&mut self, next: BillStatus) -> BillingResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(BillingError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Candidate bill fields produced by an extraction service, before the bill is accepted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub amount: Option<BigDecimal>,
    /// Address printed on the document
    pub address: Option<String>,
    /// Address of the property the document was uploaded for
    pub property_address: Option<String>,
    pub bill_number: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub bill_date: Option<NaiveDate>,
    pub contract_id: Option<String>,
    pub iban: Option<String>,
    pub legal_name: Option<String>,
    /// Name of the supplier pattern that matched the document
    pub matched_pattern_name: Option<String>,
    pub matched_pattern_bill_type: Option<String>,
    #[serde(default)]
    pub address_matches: bool,
    pub address_warning: Option<String>,
    /// 0-100
    pub address_confidence: Option<u8>,
}

/// Owner account used to receive rent in one settlement currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutAccount {
    pub currency: String,
    pub iban: String,
    pub label: String,
}

impl PayoutAccount {
    pub fn new(currency: &str, iban: &str, label: &str) -> Self {
        Self {
            currency: currency.to_uppercase(),
            iban: iban.to_string(),
            label: label.to_string(),
        }
    }
}

/// Payout configuration of the owner of a property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerPayoutProfile {
    pub owner_name: Option<String>,
    pub accounts: Vec<PayoutAccount>,
    /// Currency the property settles rent in; the engine default applies when unset
    pub settlement_currency: Option<String>,
}

/// Snapshot of exchange rates, keyed by upper-case ISO-4217 code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    rates: HashMap<String, BigDecimal>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_rate(mut self, currency: &str, rate: BigDecimal) -> Self {
        self.insert(currency, rate);
        self
    }

    pub fn insert(&mut self, currency: &str, rate: BigDecimal) {
        self.rates.insert(currency.to_uppercase(), rate);
    }

    /// Usable rate for a currency. Zero or negative rates count as missing.
    pub fn get(&self, currency: &str) -> Option<&BigDecimal> {
        self.rates
            .get(&currency.to_uppercase())
            .filter(|rate| *rate > &BigDecimal::zero())
    }

    /// Rate for a currency, defaulting to 1 when absent
    pub fn rate(&self, currency: &str) -> BigDecimal {
        self.get(currency)
            .cloned()
            .unwrap_or_else(|| BigDecimal::from(1))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, BigDecimal)> for ExchangeRateTable {
    fn from_iter<I: IntoIterator<Item = (String, BigDecimal)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (currency, rate) in iter {
            table.insert(&currency, rate);
        }
        table
    }
}

/// An amount tagged with its currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: BigDecimal,
}

impl CurrencyAmount {
    pub fn new(currency: &str, amount: BigDecimal) -> Self {
        Self {
            currency: currency.to_uppercase(),
            amount,
        }
    }
}

/// Bills shown together on a statement: the most recent one plus collapsed history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillGroup {
    pub group_key: String,
    pub latest_bill: Bill,
    /// Ordered by due date, most recent first
    pub older_bills: Vec<Bill>,
}

impl BillGroup {
    /// Number of bills in the group
    pub fn bill_count(&self) -> usize {
        1 + self.older_bills.len()
    }

    pub fn has_history(&self) -> bool {
        !self.older_bills.is_empty()
    }
}

/// Where and how a renter pays a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRoute {
    pub beneficiary: String,
    pub iban: String,
    /// Currency of the receiving account, when known
    pub iban_currency: Option<String>,
    pub reference: String,
    /// Secondary reference (supplier client code)
    pub reference2: Option<String>,
}

/// Rates snapshot held for the duration of a renter session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenterBalance {
    pub exchange_rates: ExchangeRateTable,
}

/// Inclusive date range a statement is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        use chrono::Datelike;

        let start = date.with_day(1).unwrap_or(date);
        let next_month = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(date);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Treat empty strings as absent
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Errors that can occur in the billing system
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Bill not found: {0}")]
    BillNotFound(String),
    #[error("Property not found: {0}")]
    PropertyNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: BillStatus, to: BillStatus },
    #[error("Incomplete extraction: {0}")]
    IncompleteExtraction(String),
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_bill() -> Bill {
        Bill::new(
            "prop-1".to_string(),
            "Water".to_string(),
            BillType::Utilities,
            BigDecimal::from(120),
            "ron".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )
    }

    #[test]
    fn test_status_transitions() {
        assert!(BillStatus::Pending.can_transition_to(BillStatus::Paid));
        assert!(BillStatus::Pending.can_transition_to(BillStatus::Overdue));
        assert!(BillStatus::Overdue.can_transition_to(BillStatus::Paid));
        assert!(!BillStatus::Paid.can_transition_to(BillStatus::Pending));
        assert!(!BillStatus::Paid.can_transition_to(BillStatus::Overdue));
        assert!(!BillStatus::Overdue.can_transition_to(BillStatus::Pending));
    }

    #[test]
    fn test_paid_bill_is_frozen() {
        let mut bill = sample_bill();
        bill.transition(BillStatus::Paid).unwrap();
        let err = bill.transition(BillStatus::Overdue).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidStatusTransition {
                from: BillStatus::Paid,
                to: BillStatus::Overdue
            }
        ));
    }

    #[test]
    fn test_remaining_amount() {
        let mut bill = sample_bill();
        assert_eq!(bill.currency, "RON");
        assert_eq!(bill.remaining_amount(), BigDecimal::from(120));

        bill.remaining = Some(BigDecimal::from(45));
        assert_eq!(bill.remaining_amount(), BigDecimal::from(45));

        bill.remaining = Some(BigDecimal::from(-5));
        assert_eq!(bill.remaining_amount(), BigDecimal::from(0));

        bill.remaining = None;
        bill.amount = BigDecimal::from(-50);
        assert_eq!(bill.remaining_amount(), BigDecimal::from(0));

        bill.remaining = Some(BigDecimal::from(45));
        bill.transition(BillStatus::Paid).unwrap();
        assert_eq!(bill.remaining_amount(), BigDecimal::from(0));
    }

    #[test]
    fn test_rate_table_lookup() {
        let table = ExchangeRateTable::new()
            .with_rate("eur", BigDecimal::from(1))
            .with_rate("RON", BigDecimal::from_str("4.97").unwrap())
            .with_rate("XXX", BigDecimal::from(0));

        assert_eq!(table.rate("Eur"), BigDecimal::from(1));
        assert_eq!(table.rate("ron"), BigDecimal::from_str("4.97").unwrap());
        assert!(table.get("XXX").is_none());
        assert_eq!(table.rate("XXX"), BigDecimal::from(1));
        assert_eq!(table.rate("GBP"), BigDecimal::from(1));
    }

    #[test]
    fn test_bill_type_labels() {
        assert_eq!(BillType::from_label(" Rent "), BillType::Rent);
        assert_eq!(BillType::from_label("utilities"), BillType::Utilities);
        assert_eq!(BillType::from_label("gadgets"), BillType::Other);

        let parsed: BillType = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(parsed, BillType::Other);
    }

    #[test]
    fn test_month_period() {
        let period = BillingPeriod::month_of(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let december = BillingPeriod::month_of(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(december.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(december.contains(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()));
        assert!(!december.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }
}
