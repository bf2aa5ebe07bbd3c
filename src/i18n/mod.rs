//! Language handling for the translation pipeline.
//!
//! - `language`: the closed set of supported languages and their display names
//! - `validator`: post-translation checks (linefeeds, URLs)
//! - `metrics`: per-run counters reported at the end of a run

mod language;
mod metrics;
mod validator;

pub use language::Language;
pub use metrics::{MetricsReport, RunMetrics};
pub use validator::{TranslationValidator, ValidationReport};
