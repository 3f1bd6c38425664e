//! Trend Analyzer
//!
//! Rolling per-(exhibit, sensor) history used for the deviation check.
//! Process-scoped only: the registry starts empty on every restart.

mod window;
mod registry;

pub use window::{HistoryWindow, WindowStats};
pub use registry::{ExhibitHistory, HistoryRegistry};
