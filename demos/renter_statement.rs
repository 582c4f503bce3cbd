//! Renter statement and payment instructions example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use rental_billing_core::utils::MemoryStorage;
use rental_billing_core::{
    round_money, Bill, BillType, BillingPeriod, ExchangeRateTable, OwnerPayoutProfile,
    PaymentDetails, PayoutAccount, ReconciliationEngine,
};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏠 Rental Billing Core - Renter Statement Example\n");

    let storage = MemoryStorage::new();
    storage.set_exchange_rates(
        ExchangeRateTable::new()
            .with_rate("EUR", BigDecimal::from(1))
            .with_rate("RON", BigDecimal::from_str("4.97")?)
            .with_rate("USD", BigDecimal::from_str("1.08")?),
    )?;
    storage.set_owner_payout_profile(
        "apt-12",
        OwnerPayoutProfile {
            owner_name: Some("Ana Popescu".to_string()),
            accounts: vec![
                PayoutAccount::new("EUR", "RO49AAAA1B31007593840000", "Euro account"),
                PayoutAccount::new("RON", "RO09BCYP0000001234567890", "Lei account"),
            ],
            settlement_currency: Some("EUR".to_string()),
        },
    )?;

    let mut engine = ReconciliationEngine::new(storage);

    // 1. Record a few months of bills
    println!("🧾 Recording bills...");
    let mut bills = Vec::new();
    for (month, description) in [(1, "January Rent"), (2, "February Rent"), (3, "March Rent")] {
        let mut rent = Bill::new(
            "apt-12".to_string(),
            description.to_string(),
            BillType::Rent,
            BigDecimal::from(450),
            "EUR".to_string(),
            NaiveDate::from_ymd_opt(2024, month, 1).ok_or("invalid date")?,
        );
        rent.renter_id = Some("renter-7".to_string());
        rent.contract_id = Some("CTR-2023-118".to_string());
        bills.push(rent);
    }

    let mut electricity = Bill::new(
        "apt-12".to_string(),
        "Electricity".to_string(),
        BillType::Utilities,
        BigDecimal::from_str("187.35")?,
        "RON".to_string(),
        NaiveDate::from_ymd_opt(2024, 3, 18).ok_or("invalid date")?,
    );
    electricity.renter_id = Some("renter-7".to_string());
    electricity.iban = Some("RO66BACX0000001234567890".to_string());
    electricity.legal_name = Some("Enel Energie Muntenia".to_string());
    electricity.bill_number = Some("EN-5521".to_string());
    electricity.payment_details = Some(PaymentDetails {
        client_code: Some("CLI-0042".to_string()),
    });
    bills.push(electricity);

    for bill in &bills {
        engine.add_bill(bill).await?;
        println!("  ✓ {} ({} {})", bill.description, bill.amount, bill.currency);
    }
    engine.mark_paid(&bills[0].id).await?;
    engine.mark_paid(&bills[1].id).await?;

    // 2. Build the March statement
    let march_first = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?;
    let march = BillingPeriod::month_of(march_first);
    let statement = engine.renter_statement("renter-7", march).await?;

    println!("\n📊 Statement groups:");
    for group in &statement.groups {
        println!(
            "  {} → latest: {} (due {}), {} older",
            group.group_key,
            group.latest_bill.description,
            group.latest_bill.due_date,
            group.older_bills.len()
        );
    }

    let balance = &statement.balance;
    println!("\n💰 Balance ({}):", balance.pivot_currency);
    println!("  Due this month: {}", round_money(&balance.period_total));
    println!("  Paid this month: {}", round_money(&balance.period_paid));
    println!("  Outstanding:     {}", round_money(&balance.outstanding_total));

    // 3. Payment instructions for every open bill
    println!("\n🏦 How to pay:");
    for open in &balance.outstanding {
        match engine
            .payment_instructions_with_rates(&open.bill_id, Some("USD"), &statement.session)
            .await?
        {
            Some(instructions) => {
                let route = &instructions.route;
                println!("  {}:", open.description);
                println!("    Beneficiary: {}", route.beneficiary);
                println!("    IBAN:        {}", route.iban);
                println!("    Reference:   {}", route.reference);
                if let Some(reference2) = &route.reference2 {
                    println!("    Client code: {}", reference2);
                }
                for equivalent in &instructions.equivalents {
                    println!(
                        "    ≈ {} {}",
                        round_money(&equivalent.amount),
                        equivalent.currency
                    );
                }
            }
            None => println!("  {}: payment method unavailable", open.description),
        }
    }

    Ok(())
}
