//! Renter statements: grouped bill history and balance totals

pub mod balance;
pub mod grouping;

pub use balance::*;
pub use grouping::*;
