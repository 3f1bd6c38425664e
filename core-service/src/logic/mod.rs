//! Logic Module - Evaluation Engines
//!
//! Pure decision logic. Nothing here performs I/O except the explanation
//! and vision collaborators, which sit behind traits.

pub mod reading;
pub mod policy;
pub mod trend;
pub mod verdict;
pub mod evaluator;
pub mod vision;
pub mod explain;
