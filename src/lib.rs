//! Turns a noisy per-frame hand-pose stream into debounced, one-shot
//! navigation key presses.
//!
//! Per frame: [`gesture::GestureClassifier`] labels the pose,
//! [`pipeline::StabilityFilter`] smooths it by majority vote,
//! [`pipeline::ActionGate`] lets one action through per non-neutral run, and
//! [`pipeline::ActionDispatcher`] taps the bound key.

pub mod config;
pub mod error;
pub mod gesture;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, DispatchError, PipelineError, SourceError};
