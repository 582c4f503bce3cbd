//! Bill grouping for renter statements
//!
//! All rent collapses into one group; every other bill is grouped by its
//! description, case-insensitively. Each group shows its most recent bill
//! with the rest as collapsed history.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::*;

/// Key of the single group holding every rent bill
pub const RENT_GROUP_KEY: &str = "type-rent";
/// Key shared by bills without a description
pub const NO_DESCRIPTION_GROUP_KEY: &str = "no-description";

/// Partitions a renter's bills into statement groups
#[derive(Debug, Clone, Copy, Default)]
pub struct BillGroupingEngine;

impl BillGroupingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Group bills. Every input bill ends up in exactly one group.
    pub fn group(&self, bills: &[Bill]) -> Vec<BillGroup> {
        let mut keys: Vec<String> = Vec::new();
        let mut buckets: HashMap<String, Vec<Bill>> = HashMap::new();

        for bill in bills {
            let key = group_key(bill);
            buckets
                .entry(key.clone())
                .or_insert_with(|| {
                    keys.push(key);
                    Vec::new()
                })
                .push(bill.clone());
        }

        let mut groups: Vec<BillGroup> = keys
            .into_iter()
            .filter_map(|key| {
                let bills = buckets.remove(&key)?;
                build_group(key, bills)
            })
            .collect();

        groups.sort_by(|a, b| {
            most_recent_first(&a.latest_bill, &b.latest_bill)
                .then_with(|| a.group_key.cmp(&b.group_key))
        });
        groups
    }
}

/// Statement group a bill belongs to
pub fn group_key(bill: &Bill) -> String {
    if bill.bill_type == BillType::Rent {
        return RENT_GROUP_KEY.to_string();
    }
    match non_empty(Some(bill.description.as_str())) {
        Some(description) => format!("desc-{}", description.trim().to_lowercase()),
        None => NO_DESCRIPTION_GROUP_KEY.to_string(),
    }
}

fn build_group(group_key: String, mut bills: Vec<Bill>) -> Option<BillGroup> {
    bills.sort_by(most_recent_first);
    let mut bills = bills.into_iter();
    let latest_bill = bills.next()?;
    Some(BillGroup {
        group_key,
        latest_bill,
        older_bills: bills.collect(),
    })
}

/// Due date descending; equal due dates put the most recently created bill
/// first, then fall back to bill id so the order never depends on input order.
fn most_recent_first(a: &Bill, b: &Bill) -> Ordering {
    b.due_date
        .cmp(&a.due_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn bill(id: &str, bill_type: BillType, description: &str, due: (i32, u32, u32)) -> Bill {
        let mut bill = Bill::new(
            "prop-1".to_string(),
            description.to_string(),
            bill_type,
            BigDecimal::from(100),
            "RON".to_string(),
            NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap(),
        );
        bill.id = id.to_string();
        bill.created_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        bill
    }

    fn ids(bills: &[Bill]) -> Vec<&str> {
        bills.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_rent_and_utilities() {
        let bills = vec![
            bill("rent-mar", BillType::Rent, "March Rent", (2024, 3, 1)),
            bill("rent-feb", BillType::Rent, "February Rent", (2024, 2, 1)),
            bill("water-mar", BillType::Utilities, "Water", (2024, 3, 15)),
        ];

        let groups = BillGroupingEngine::new().group(&bills);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_key, "desc-water");
        assert_eq!(groups[0].latest_bill.id, "water-mar");
        assert!(groups[0].older_bills.is_empty());
        assert!(!groups[0].has_history());

        assert_eq!(groups[1].group_key, RENT_GROUP_KEY);
        assert_eq!(groups[1].latest_bill.id, "rent-mar");
        assert_eq!(ids(&groups[1].older_bills), vec!["rent-feb"]);
    }

    #[test]
    fn test_description_is_case_insensitive() {
        let bills = vec![
            bill("w1", BillType::Utilities, "Water", (2024, 1, 10)),
            bill("w2", BillType::Utilities, "WATER ", (2024, 3, 10)),
            bill("w3", BillType::Other, "water", (2024, 2, 10)),
            bill("gas", BillType::Utilities, "Gas", (2024, 2, 20)),
        ];

        let groups = BillGroupingEngine::new().group(&bills);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_key, "desc-water");
        assert_eq!(groups[0].latest_bill.id, "w2");
        assert_eq!(ids(&groups[0].older_bills), vec!["w3", "w1"]);
        assert_eq!(groups[1].group_key, "desc-gas");
    }

    #[test]
    fn test_missing_descriptions_share_a_bucket() {
        let bills = vec![
            bill("a", BillType::Other, "", (2024, 1, 1)),
            bill("b", BillType::Utilities, "  ", (2024, 2, 1)),
        ];
        let groups = BillGroupingEngine::new().group(&bills);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_key, NO_DESCRIPTION_GROUP_KEY);
        assert_eq!(groups[0].bill_count(), 2);
    }

    #[test]
    fn test_rent_ignores_description() {
        let bills = vec![
            bill("r1", BillType::Rent, "Rent", (2024, 1, 1)),
            bill("r2", BillType::Rent, "Chirie", (2024, 2, 1)),
        ];
        let groups = BillGroupingEngine::new().group(&bills);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].latest_bill.id, "r2");
    }

    #[test]
    fn test_empty_input() {
        assert!(BillGroupingEngine::new().group(&[]).is_empty());
    }

    #[test]
    fn test_ties_do_not_depend_on_input_order() {
        let first = bill("b-2", BillType::Utilities, "Gas", (2024, 3, 1));
        let second = bill("b-1", BillType::Utilities, "Gas", (2024, 3, 1));

        let forward = BillGroupingEngine::new().group(&[first.clone(), second.clone()]);
        let backward = BillGroupingEngine::new().group(&[second, first]);

        assert_eq!(forward[0].latest_bill.id, "b-1");
        assert_eq!(forward, backward);

        let a = bill("x", BillType::Utilities, "Alpha", (2024, 3, 1));
        let z = bill("y", BillType::Utilities, "Zeta", (2024, 3, 1));
        let groups = BillGroupingEngine::new().group(&[z, a]);
        assert_eq!(groups[0].group_key, "desc-alpha");
    }

    #[test]
    fn test_groups_partition_input() {
        let bills = vec![
            bill("1", BillType::Rent, "Rent", (2024, 1, 1)),
            bill("2", BillType::Utilities, "Water", (2024, 1, 5)),
            bill("3", BillType::Rent, "Rent", (2024, 2, 1)),
            bill("4", BillType::Telecom, "Internet", (2024, 2, 3)),
            bill("5", BillType::Utilities, "water", (2024, 2, 5)),
            bill("6", BillType::Other, "", (2024, 2, 9)),
        ];

        let groups = BillGroupingEngine::new().group(&bills);
        let mut seen: Vec<String> = groups
            .iter()
            .flat_map(|g| std::iter::once(&g.latest_bill).chain(g.older_bills.iter()))
            .map(|b| b.id.clone())
            .collect();
        seen.sort();

        assert_eq!(seen, vec!["1", "2", "3", "4", "5", "6"]);
        assert!(groups
            .windows(2)
            .all(|w| w[0].latest_bill.due_date >= w[1].latest_bill.due_date));
    }
}
