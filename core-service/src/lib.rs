//! Exhibit Guard Core - Anomaly Evaluation Engine
//!
//! Takes sensor readings (temperature, humidity, vibration) or vision
//! detections for a museum exhibit and produces a classified, explained
//! anomaly verdict.
//!
//! ## Layout
//! - `logic/reading` - optional-field sensor readings + input validation
//! - `logic/policy` - per-exhibit threshold policies
//! - `logic/trend` - rolling history windows and the per-exhibit registry
//! - `logic/evaluator` - hard threshold + trend rules, severity buckets
//! - `logic/vision` - detection filtering against a vision rule set
//! - `logic/explain` - explanation providers (remote, template, fallback)
//! - `service` - glue: validate, evaluate, explain under a timeout

pub mod constants;
pub mod config;
pub mod error;
pub mod logic;
pub mod service;

pub use config::{EngineConfig, SeverityBands, TrendConfig};
pub use error::{EngineError, Result};
pub use logic::evaluator::{evaluate, RuleEvaluator};
pub use logic::explain::{
    ExplanationProvider, ExplainError, FallbackProvider, RemoteProvider, RemoteProviderConfig,
    TemplateProvider,
};
pub use logic::policy::{PolicyConfig, ThresholdPolicy};
pub use logic::reading::{ExhibitId, SensorKind, SensorReading};
pub use logic::trend::{ExhibitHistory, HistoryRegistry, HistoryWindow, WindowStats};
pub use logic::verdict::{AnomalyVerdict, Severity, Violation, ViolationKind};
pub use logic::vision::{
    decide, decide_at, BoundingBox, Detection, HttpVisionClassifier, OpeningHours,
    VisionClassifier, VisionError, VisionRule, VisionRuleSet, VisionVerdict,
};
pub use service::AnomalyService;
