//! Cross-currency conversion through a single pivot currency

pub mod converter;

pub use converter::*;
