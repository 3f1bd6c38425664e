//! Threshold Policy Module
//!
//! Per-exhibit safe ranges. A `ThresholdPolicy` value only exists in a
//! validated state: construction and deserialization both go through
//! `validate`, so a malformed policy fails when it is loaded, never during
//! evaluation.

mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use types::{PolicyConfig, SensorBounds, ThresholdPolicy};
pub use validate::validate_bounds;
