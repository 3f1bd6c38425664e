//! Vision Anomaly Decision
//!
//! The object-detection model is an external collaborator. This module only
//! decides which of its detections matter for an exhibit, and degrades to
//! "no detections" when the classifier cannot be reached.

mod types;
mod decision;
mod classifier;

pub use types::{BoundingBox, Detection, OpeningHours, VisionRule, VisionRuleSet, VisionVerdict};
pub use decision::{decide, decide_at};
pub use classifier::{analyze_frame, HttpVisionClassifier, VisionClassifier, VisionError};
