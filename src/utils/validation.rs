//! Validation utilities

use bigdecimal::{BigDecimal, Zero};

use crate::traits::*;
use crate::types::*;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BillingResult<()> {
    if *amount <= BigDecimal::zero() {
        Err(BillingError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a currency code looks like ISO-4217 (three ASCII letters)
pub fn validate_currency_code(currency: &str) -> BillingResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BillingError::Validation(format!(
            "Invalid currency code '{}'",
            currency
        )));
    }

    Ok(())
}

/// Validate the shape of an IBAN: country code, check digits, 11-30
/// alphanumeric characters. Spaces are ignored.
pub fn validate_iban(iban: &str) -> BillingResult<()> {
    let compact: String = iban.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.len() < 15 || compact.len() > 34 {
        return Err(BillingError::Validation(
            "IBAN must be between 15 and 34 characters".to_string(),
        ));
    }

    if !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BillingError::Validation(format!(
            "Malformed IBAN '{}'",
            iban
        )));
    }

    let (country, rest) = compact.split_at(2);
    let check_digits = &rest[..2];

    if !country.chars().all(|c| c.is_ascii_alphabetic())
        || !check_digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(BillingError::Validation(format!(
            "Malformed IBAN '{}'",
            iban
        )));
    }

    Ok(())
}

/// Validate that a bill description is valid
pub fn validate_bill_description(description: &str) -> BillingResult<()> {
    if description.len() > 500 {
        return Err(BillingError::Validation(
            "Bill description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced bill validator with detailed checks
pub struct EnhancedBillValidator;

impl BillValidator for EnhancedBillValidator {
    fn validate_bill(&self, bill: &Bill) -> BillingResult<()> {
        // Basic validation
        DefaultBillValidator.validate_bill(bill)?;

        if bill.property_id.trim().is_empty() {
            return Err(BillingError::Validation(
                "Bill must belong to a property".to_string(),
            ));
        }

        validate_positive_amount(&bill.amount)?;
        validate_currency_code(&bill.currency)?;
        validate_bill_description(&bill.description)?;

        if let Some(iban) = non_empty(bill.iban.as_deref()) {
            validate_iban(iban)?;
        }

        Ok(())
    }
}
