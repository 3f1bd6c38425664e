//! Rule Evaluator
//!
//! Hard thresholds from the exhibit policy plus the rolling trend check.
//! Deterministic and free of I/O: explanations are attached later by the
//! service layer.

mod rules;
mod engine;

#[cfg(test)]
mod tests;

pub use rules::{check_bounds, check_trend};
pub use engine::{evaluate, RuleEvaluator};
