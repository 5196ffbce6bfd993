//! Completion service port
//!
//! Defines the single call-and-return contract through which participants
//! produce text. The core never retries a failed call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a completion service can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Which deliberation step a completion call serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPurpose {
    /// Strict speak-or-pass question from the speaker gate
    SpeakConfirmation,
    ExpertFeedback,
    CoordinatorRevision,
}

impl CompletionPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionPurpose::SpeakConfirmation => "speak_confirmation",
            CompletionPurpose::ExpertFeedback => "expert_feedback",
            CompletionPurpose::CoordinatorRevision => "coordinator_revision",
        }
    }
}

/// One completion call
///
/// The prompt is the whole contract; participant, purpose and round are
/// carried so adapters can route or label the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub participant: String,
    pub purpose: CompletionPurpose,
    pub round: u32,
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(
        participant: impl Into<String>,
        purpose: CompletionPurpose,
        round: u32,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            participant: participant.into(),
            purpose,
            round,
            prompt: prompt.into(),
        }
    }
}

/// Text generation backend for participants
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Return the generated text for `request`, or a service error
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
