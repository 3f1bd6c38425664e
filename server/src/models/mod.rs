//! Data models

pub mod exhibit;
pub mod anomaly;

pub use exhibit::*;
pub use anomaly::*;
