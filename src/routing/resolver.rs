//! Payment route resolution
//!
//! Rent and direct-debit bills are paid to the property owner, into one of
//! the owner's payout accounts. Every other bill is paid straight to the
//! supplier printed on it. A route is only produced when the identifying
//! fields for the chosen strategy are all present.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::currency::CurrencyConverter;
use crate::types::*;

/// Which party a bill is paid to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Renter pays the owner (rent, direct debit)
    OwnerAccount,
    /// Renter pays the supplier using the bill's own IBAN
    SupplierIban,
}

impl RouteStrategy {
    pub fn for_bill(bill: &Bill) -> Self {
        if bill.bill_type == BillType::Rent || bill.is_direct_debit {
            RouteStrategy::OwnerAccount
        } else {
            RouteStrategy::SupplierIban
        }
    }
}

/// Why no route could be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RouteUnavailable {
    #[error("owner has no payout account")]
    NoOwnerAccount,
    #[error("owner name is not configured")]
    NoOwnerName,
    #[error("bill has no IBAN")]
    MissingIban,
    #[error("bill has no legal name")]
    MissingLegalName,
}

/// Everything a renter needs to pay one bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInstructions {
    pub bill_id: String,
    pub strategy: RouteStrategy,
    pub route: PaymentRoute,
    /// Outstanding amount in the bill's currency
    pub amount: CurrencyAmount,
    /// The same amount expressed in other relevant currencies
    pub equivalents: Vec<CurrencyAmount>,
}

/// Resolves payment routes and the currency equivalents shown next to them
#[derive(Debug, Clone)]
pub struct PaymentRouteResolver {
    converter: CurrencyConverter,
    default_settlement_currency: String,
}

impl Default for PaymentRouteResolver {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl PaymentRouteResolver {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            converter: CurrencyConverter::from_config(config),
            default_settlement_currency: config.default_settlement_currency.to_uppercase(),
        }
    }

    /// Resolve a route, or `None` when the required fields are missing
    pub fn resolve(
        &self,
        bill: &Bill,
        owner_accounts: &[PayoutAccount],
        owner_name: Option<&str>,
        preferred_currency: Option<&str>,
    ) -> Option<PaymentRoute> {
        match self.try_resolve(bill, owner_accounts, owner_name, preferred_currency) {
            Ok(route) => Some(route),
            Err(reason) => {
                tracing::debug!(bill_id = %bill.id, %reason, "payment route unavailable");
                None
            }
        }
    }

    /// Resolve a route, reporting which field prevented it
    pub fn try_resolve(
        &self,
        bill: &Bill,
        owner_accounts: &[PayoutAccount],
        owner_name: Option<&str>,
        preferred_currency: Option<&str>,
    ) -> Result<PaymentRoute, RouteUnavailable> {
        match RouteStrategy::for_bill(bill) {
            RouteStrategy::OwnerAccount => {
                self.owner_route(bill, owner_accounts, owner_name, preferred_currency)
            }
            RouteStrategy::SupplierIban => supplier_route(bill),
        }
    }

    fn owner_route(
        &self,
        bill: &Bill,
        owner_accounts: &[PayoutAccount],
        owner_name: Option<&str>,
        preferred_currency: Option<&str>,
    ) -> Result<PaymentRoute, RouteUnavailable> {
        let preferred =
            non_empty(preferred_currency).unwrap_or(self.default_settlement_currency.as_str());
        let account = select_account(owner_accounts, preferred)
            .ok_or(RouteUnavailable::NoOwnerAccount)?;
        let owner_name = non_empty(owner_name).ok_or(RouteUnavailable::NoOwnerName)?;

        let reference = non_empty(bill.contract_id.as_deref())
            .or_else(|| non_empty(Some(bill.description.as_str())))
            .unwrap_or(bill.id.as_str())
            .trim()
            .to_string();

        Ok(PaymentRoute {
            beneficiary: owner_name.to_string(),
            iban: account.iban.trim().to_string(),
            iban_currency: Some(account.currency.clone()),
            reference,
            reference2: None,
        })
    }

    /// Amounts shown alongside the route.
    ///
    /// Owner-routed bills list the outstanding amount in every payout
    /// account currency, plus the renter's currency when it is not one of
    /// them. Supplier-routed bills get a single pivot equivalent unless they
    /// are already in the pivot currency.
    pub fn equivalents(
        &self,
        bill: &Bill,
        owner_accounts: &[PayoutAccount],
        renter_currency: Option<&str>,
        rates: &ExchangeRateTable,
    ) -> Vec<CurrencyAmount> {
        let remaining = bill.remaining_amount();

        match RouteStrategy::for_bill(bill) {
            RouteStrategy::OwnerAccount => {
                let mut currencies: Vec<String> = Vec::new();
                for account in owner_accounts {
                    let currency = account.currency.to_uppercase();
                    if !currencies.contains(&currency) {
                        currencies.push(currency);
                    }
                }
                if let Some(renter_currency) = non_empty(renter_currency) {
                    let renter_currency = renter_currency.to_uppercase();
                    if !currencies.contains(&renter_currency) {
                        currencies.push(renter_currency);
                    }
                }

                currencies
                    .iter()
                    .map(|currency| {
                        CurrencyAmount::new(
                            currency,
                            self.converter
                                .convert(&remaining, &bill.currency, currency, rates),
                        )
                    })
                    .collect()
            }
            RouteStrategy::SupplierIban => {
                if bill
                    .currency
                    .eq_ignore_ascii_case(self.converter.pivot_currency())
                {
                    Vec::new()
                } else {
                    vec![self
                        .converter
                        .pivot_amount(&remaining, &bill.currency, rates)]
                }
            }
        }
    }

    /// Route plus display amounts for one bill
    pub fn instructions(
        &self,
        bill: &Bill,
        profile: &OwnerPayoutProfile,
        renter_currency: Option<&str>,
        rates: &ExchangeRateTable,
    ) -> Option<PaymentInstructions> {
        let route = self.resolve(
            bill,
            &profile.accounts,
            profile.owner_name.as_deref(),
            profile.settlement_currency.as_deref(),
        )?;

        Some(PaymentInstructions {
            bill_id: bill.id.clone(),
            strategy: RouteStrategy::for_bill(bill),
            route,
            amount: CurrencyAmount::new(&bill.currency, bill.remaining_amount()),
            equivalents: self.equivalents(bill, &profile.accounts, renter_currency, rates),
        })
    }
}

/// Account in the preferred currency, else the first one listed. Accounts
/// without an IBAN are skipped.
fn select_account<'a>(accounts: &'a [PayoutAccount], preferred: &str) -> Option<&'a PayoutAccount> {
    let mut usable = accounts
        .iter()
        .filter(|account| non_empty(Some(account.iban.as_str())).is_some());
    let first = usable.next()?;
    if first.currency.eq_ignore_ascii_case(preferred) {
        return Some(first);
    }
    usable
        .find(|account| account.currency.eq_ignore_ascii_case(preferred))
        .or(Some(first))
}

fn supplier_route(bill: &Bill) -> Result<PaymentRoute, RouteUnavailable> {
    let iban = non_empty(bill.iban.as_deref()).ok_or(RouteUnavailable::MissingIban)?;
    let legal_name =
        non_empty(bill.legal_name.as_deref()).ok_or(RouteUnavailable::MissingLegalName)?;

    let reference = non_empty(bill.contract_id.as_deref())
        .or_else(|| non_empty(bill.bill_number.as_deref()))
        .unwrap_or(bill.id.as_str())
        .to_string();

    Ok(PaymentRoute {
        beneficiary: legal_name.to_string(),
        iban: iban.to_string(),
        iban_currency: None,
        reference,
        reference2: bill.client_code().map(str::to_string),
    })
}
