//! Extraction confidence scoring example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use rental_billing_core::{ExtractionResult, ExtractionReviewer};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔎 Rental Billing Core - Extraction Review Example\n");

    let reviewer = ExtractionReviewer::default();

    let candidates = [
        (
            "Complete supplier invoice",
            ExtractionResult {
                amount: Some(BigDecimal::from_str("212.40")?),
                address: Some("Strada Exemplu 4, Cluj-Napoca".to_string()),
                bill_number: Some("GZ-88".to_string()),
                due_date: NaiveDate::from_ymd_opt(2024, 4, 10),
                bill_date: NaiveDate::from_ymd_opt(2024, 3, 10),
                contract_id: Some("C-1290".to_string()),
                iban: Some("RO49AAAA1B31007593840000".to_string()),
                legal_name: Some("Engie Romania".to_string()),
                address_matches: true,
                ..Default::default()
            },
        ),
        (
            "Blurry photo with an address",
            ExtractionResult {
                amount: Some(BigDecimal::from(80)),
                address: Some("Str. Exemplu".to_string()),
                address_matches: true,
                ..Default::default()
            },
        ),
        (
            "Document for another property",
            ExtractionResult {
                amount: Some(BigDecimal::from(95)),
                bill_number: Some("W-17".to_string()),
                due_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                address: Some("Bulevardul Unirii 20".to_string()),
                address_matches: false,
                address_warning: Some("Address does not match the property".to_string()),
                ..Default::default()
            },
        ),
    ];

    for (label, candidate) in candidates.iter() {
        let review = reviewer.review(candidate);
        println!("📄 {}", label);
        println!(
            "  Score: {}% ({}/{} fields) - {:?}",
            review.score.percentage, review.score.found, review.score.total, review.level
        );
        if let Some(warning) = &review.address_warning {
            println!("  ⚠️  {}", warning);
        }
        if review.requires_confirmation {
            println!("  → Ask the user to confirm before adding");
        } else {
            println!("  → Safe to add");
        }
        println!();
    }

    Ok(())
}
