//! Period and outstanding balance totals in the pivot currency

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::currency::CurrencyConverter;
use crate::types::*;

/// Outstanding amount of one unpaid bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstandingBill {
    pub bill_id: String,
    pub description: String,
    pub due_date: chrono::NaiveDate,
    pub status: BillStatus,
    /// Remaining amount in the bill's own currency
    pub remaining: CurrencyAmount,
    /// Remaining amount in the pivot currency
    pub remaining_pivot: BigDecimal,
}

/// Totals for a renter statement, all in `pivot_currency`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub pivot_currency: String,
    pub period: BillingPeriod,
    /// Everything due within the period
    pub period_total: BigDecimal,
    /// Paid bills due within the period
    pub period_paid: BigDecimal,
    /// Remaining amount of every unpaid bill, regardless of period
    pub outstanding_total: BigDecimal,
    pub outstanding: Vec<OutstandingBill>,
}

impl BalanceSummary {
    /// Amount due in the period that has not been paid yet
    pub fn period_unpaid(&self) -> BigDecimal {
        &self.period_total - &self.period_paid
    }
}

/// Sums bill amounts across currencies
#[derive(Debug, Clone, Default)]
pub struct BalanceAggregator {
    converter: CurrencyConverter,
}

impl BalanceAggregator {
    pub fn new(converter: CurrencyConverter) -> Self {
        Self { converter }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(CurrencyConverter::from_config(config))
    }

    pub fn aggregate(
        &self,
        bills: &[Bill],
        rates: &ExchangeRateTable,
        period: BillingPeriod,
    ) -> BalanceSummary {
        let mut period_total = BigDecimal::zero();
        let mut period_paid = BigDecimal::zero();
        let mut outstanding_total = BigDecimal::zero();
        let mut outstanding = Vec::new();

        for bill in bills {
            if period.contains(bill.due_date) {
                let converted = self.converter.to_pivot(&bill.amount, &bill.currency, rates);
                if bill.is_paid() {
                    period_paid += &converted;
                }
                period_total += converted;
            }

            if !bill.is_paid() {
                let remaining = bill.remaining_amount();
                let remaining_pivot = self.converter.to_pivot(&remaining, &bill.currency, rates);
                outstanding_total += &remaining_pivot;
                outstanding.push(OutstandingBill {
                    bill_id: bill.id.clone(),
                    description: bill.description.clone(),
                    due_date: bill.due_date,
                    status: bill.status,
                    remaining: CurrencyAmount::new(&bill.currency, remaining),
                    remaining_pivot,
                });
            }
        }

        outstanding.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.bill_id.cmp(&b.bill_id))
        });

        BalanceSummary {
            pivot_currency: self.converter.pivot_currency().to_string(),
            period,
            period_total,
            period_paid,
            outstanding_total,
            outstanding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(id: &str, amount: &str, currency: &str, due: NaiveDate, status: BillStatus) -> Bill {
        let mut bill = Bill::new(
            "prop-1".to_string(),
            format!("Bill {}", id),
            BillType::Utilities,
            dec(amount),
            currency.to_string(),
            due,
        );
        bill.id = id.to_string();
        bill.status = status;
        bill
    }

    fn rates() -> ExchangeRateTable {
        ExchangeRateTable::new()
            .with_rate("EUR", dec("1"))
            .with_rate("RON", dec("5"))
    }

    fn march() -> BillingPeriod {
        BillingPeriod::month_of(date(2024, 3, 1))
    }

    #[test]
    fn test_period_and_outstanding_totals() {
        let bills = vec![
            bill("rent", "500", "EUR", date(2024, 3, 1), BillStatus::Paid),
            bill("water", "150", "RON", date(2024, 3, 20), BillStatus::Pending),
            bill("old-gas", "40", "EUR", date(2024, 2, 10), BillStatus::Overdue),
            bill("april", "100", "RON", date(2024, 4, 5), BillStatus::Pending),
        ];

        let summary = BalanceAggregator::default().aggregate(&bills, &rates(), march());

        assert_eq!(summary.pivot_currency, "RON");
        assert_eq!(summary.period_total, dec("2650"));
        assert_eq!(summary.period_paid, dec("2500"));
        assert_eq!(summary.period_unpaid(), dec("150"));
        // 150 + 40 EUR (200 RON) + 100
        assert_eq!(summary.outstanding_total, dec("450"));
        let ids: Vec<&str> = summary.outstanding.iter().map(|o| o.bill_id.as_str()).collect();
        assert_eq!(ids, vec!["old-gas", "water", "april"]);
    }

    #[test]
    fn test_partial_payments_use_remaining() {
        let mut partly = bill("rent", "500", "EUR", date(2024, 3, 1), BillStatus::Pending);
        partly.remaining = Some(dec("120"));

        let summary = BalanceAggregator::default().aggregate(&[partly], &rates(), march());
        assert_eq!(summary.period_total, dec("2500"));
        assert_eq!(summary.outstanding_total, dec("600"));
        assert_eq!(summary.outstanding[0].remaining, CurrencyAmount::new("EUR", dec("120")));
    }

    #[test]
    fn test_missing_pivot_rate_uses_fallback() {
        let bills = vec![bill("b", "10", "EUR", date(2024, 3, 3), BillStatus::Pending)];
        let summary =
            BalanceAggregator::default().aggregate(&bills, &ExchangeRateTable::new(), march());
        assert_eq!(summary.outstanding_total, dec("49.7"));
    }

    #[test]
    fn test_empty_input() {
        let summary = BalanceAggregator::default().aggregate(&[], &rates(), march());
        assert_eq!(summary.period_total, BigDecimal::zero());
        assert_eq!(summary.period_paid, BigDecimal::zero());
        assert_eq!(summary.outstanding_total, BigDecimal::zero());
        assert!(summary.outstanding.is_empty());
    }

    #[test]
    fn test_outstanding_is_monotonic() {
        let aggregator = BalanceAggregator::default();
        let mut bills = vec![
            bill("a", "100", "EUR", date(2024, 3, 1), BillStatus::Pending),
            bill("b", "20", "RON", date(2024, 1, 1), BillStatus::Paid),
        ];
        let mut previous = aggregator.aggregate(&bills, &rates(), march()).outstanding_total;

        let additions = vec![
            bill("c", "0", "RON", date(2024, 5, 1), BillStatus::Pending),
            bill("d", "35.5", "USD", date(2023, 12, 1), BillStatus::Overdue),
            {
                let mut negative = bill("e", "10", "EUR", date(2024, 3, 9), BillStatus::Pending);
                negative.remaining = Some(dec("-3"));
                negative
            },
            bill("f", "-50", "EUR", date(2024, 3, 12), BillStatus::Pending),
            bill("g", "999", "EUR", date(2024, 3, 9), BillStatus::Pending),
        ];

        for addition in additions {
            bills.push(addition);
            let next = aggregator.aggregate(&bills, &rates(), march()).outstanding_total;
            assert!(next >= previous, "outstanding decreased: {} -> {}", previous, next);
            previous = next;
        }
    }

    #[test]
    fn test_negative_amount_owes_nothing() {
        let credit = bill("credit", "-50", "EUR", date(2024, 3, 12), BillStatus::Pending);
        let summary = BalanceAggregator::default().aggregate(&[credit], &rates(), march());
        assert_eq!(summary.outstanding_total, BigDecimal::zero());
        assert_eq!(summary.outstanding[0].remaining, CurrencyAmount::new("EUR", BigDecimal::zero()));
    }
}
