//! Central Configuration Constants
//!
//! Single source of truth for engine defaults.
//! Every value here is overridable through `EngineConfig` or the server env.

// ============================================
// Default threshold policy (conservation ranges)
// ============================================

/// Default minimum temperature (°C)
pub const DEFAULT_TEMPERATURE_MIN: f64 = 18.0;

/// Default maximum temperature (°C)
pub const DEFAULT_TEMPERATURE_MAX: f64 = 24.0;

/// Default minimum relative humidity (%)
pub const DEFAULT_HUMIDITY_MIN: f64 = 40.0;

/// Default maximum relative humidity (%)
pub const DEFAULT_HUMIDITY_MAX: f64 = 60.0;

/// Default maximum vibration (sensor units)
pub const DEFAULT_VIBRATION_MAX: f64 = 0.5;

// ============================================
// Trend analysis
// ============================================

/// Samples kept per (exhibit, sensor) window
pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

/// Prior samples required before the trend check runs
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Deviation (in standard deviations) that produces a trend violation
pub const DEFAULT_DEVIATION_MULTIPLE: f64 = 2.5;

/// Standard deviation at or below this is treated as insufficient data
pub const DEFAULT_MIN_STDDEV: f64 = 1e-6;

/// Spread assumed at least this fraction of the policy band, so tight history
/// does not turn sensor noise into trend violations (0.3 °C on an 18-24 band)
pub const DEFAULT_MIN_STDDEV_FRACTION: f64 = 0.05;

/// Lower bound for any divisor in magnitude computations
pub const EPSILON: f64 = 1e-9;

// ============================================
// Severity buckets (upper bounds, inclusive)
// ============================================

pub const SEVERITY_LOW_MAX: f64 = 0.25;
pub const SEVERITY_MEDIUM_MAX: f64 = 0.5;
pub const SEVERITY_HIGH_MAX: f64 = 0.8;

// ============================================
// Collaborators
// ============================================

/// Explanation call budget (milliseconds)
pub const DEFAULT_EXPLANATION_TIMEOUT_MS: u64 = 5_000;

/// Vision classifier call budget (milliseconds)
pub const DEFAULT_VISION_TIMEOUT_MS: u64 = 5_000;

/// Detections below this confidence are noise
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.5;

/// Default chat-completions endpoint for explanations
pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default language model
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Text used when a verdict has no violations
pub const ALL_CLEAR_TEXT: &str = "All sensor readings are within normal parameters.";

/// Engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
