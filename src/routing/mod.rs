//! Payment routing: who a renter pays, into which account, with which reference

pub mod resolver;

pub use resolver::*;
