//! Application layer for policy-council
//!
//! This crate contains the round orchestrator, port definitions, and
//! run parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeliberationParams, MIN_MAX_ROUNDS};
pub use ports::{
    completion::{CompletionError, CompletionPurpose, CompletionRequest, CompletionService},
    progress::{DeliberationProgress, NoProgress},
    transcript::{CompositeTranscript, NoTranscript, TranscriptSink},
};
pub use use_cases::run_deliberation::{
    RunDeliberationError, RunDeliberationInput, RunDeliberationUseCase,
};
