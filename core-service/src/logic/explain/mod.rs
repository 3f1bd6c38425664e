//! Explanation Generator
//!
//! Strategy interface over how a verdict gets its human-readable text:
//! - `RemoteProvider` asks a chat-completions language model
//! - `TemplateProvider` renders deterministic text from the violations
//! - `FallbackProvider` wraps a primary provider and falls back on failure
//!
//! Explanation failure never changes a verdict's classification.

mod types;
mod template;
mod remote;
mod fallback;

pub use types::{ExplainError, ExplanationProvider};
pub use template::{describe_violation, describe_vision, render, TemplateProvider};
pub use remote::{RemoteProvider, RemoteProviderConfig};
pub use fallback::FallbackProvider;
