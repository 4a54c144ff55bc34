//! Viralscript Core Library
//!
//! Analyzes why a reference video script worked and rewrites it for a new topic with a
//! schema-constrained AI completion call.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod mock;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod types;

// Re-export commonly used items at crate root
pub use client::{GenerationClient, GenerationProvider, parse_script_analysis};
pub use config::Settings;
pub use controller::{RequestController, RequestState};
pub use error::{
    ConfigError, GENERIC_FAILURE_MESSAGE, GenerationError, Result, VALIDATION_MESSAGE,
    ValidationError,
};
pub use provider::{Provider, ProviderConfig, WireFormat};
pub use render::{ResultView, render};
pub use types::{GenerationRequest, ScriptAnalysisResult};
