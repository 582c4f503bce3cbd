//! Review of automatically extracted bill data before it becomes a bill

pub mod confidence;
pub mod review;

pub use confidence::*;
pub use review::*;
