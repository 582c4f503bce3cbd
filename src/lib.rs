//! # Rental Billing Core
//!
//! Bill reconciliation and payment routing for rental properties.
//!
//! ## Features
//!
//! - **Extraction confidence**: Score automatically extracted bill fields before a bill is accepted
//! - **Statements**: Group a renter's bills into latest-plus-history groups
//! - **Balances**: Period and outstanding totals across currencies
//! - **Currency conversion**: Cross rates through a single pivot currency (RON)
//! - **Payment routing**: Beneficiary, IBAN and references for rent and supplier bills
//! - **Storage abstraction**: Backend-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use rental_billing_core::{Bill, BillType, PayoutAccount, PaymentRouteResolver};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let bill = Bill::new(
//!     "prop-1".to_string(),
//!     "March Rent".to_string(),
//!     BillType::Rent,
//!     BigDecimal::from(450),
//!     "EUR".to_string(),
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//! );
//! let accounts = vec![PayoutAccount::new("EUR", "RO49AAAA1B31007593840000", "Euro")];
//!
//! let route = PaymentRouteResolver::default()
//!     .resolve(&bill, &accounts, Some("Ana Popescu"), None)
//!     .unwrap();
//! assert_eq!(route.reference, "March Rent");
//! ```

pub mod config;
pub mod currency;
pub mod extraction;
pub mod reconciliation;
pub mod routing;
pub mod statement;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::EngineConfig;
pub use currency::*;
pub use extraction::*;
pub use reconciliation::*;
pub use routing::*;
pub use statement::*;
pub use traits::*;
pub use types::*;
