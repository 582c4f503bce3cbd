//! Reconciliation engine: ties extraction review, statements and payment
//! routing to a storage backend

pub mod engine;

pub use engine::*;
