//! Domain layer for policy-council
//!
//! This crate contains the deliberation protocol as pure types and
//! functions. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! One coordinator and several experts revise a proposal over rounds:
//!
//! - **Routing**: each participant sees only the messages [`RoutingFilter`] admits
//! - **Gating**: each expert decides per round whether to speak ([`SpeakerGate`])
//! - **Scoring**: [`ConsensusScorer`] turns the whole log into a weighted verdict
//!
//! ## Transcript
//!
//! Every message is also emitted as a [`TranscriptLine`], a stable
//! single-line wire format read by external renderers.

pub mod config;
pub mod consensus;
pub mod core;
pub mod deliberation;
pub mod message;
pub mod participant;
pub mod prompt;
pub mod transcript;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    ConsensusAnalysis, ConsensusCriteria, ConsensusScorer, Intensity, ProposalVersion, Stance,
    StanceClassifier, StanceVocabulary, UnmetGate,
};
pub use core::{
    error::DomainError,
    proposal::{Proposal, ProposalFormat},
};
pub use deliberation::{
    DeliberationOutcome, DeliberationPolicy, GateCheck, GateDecision, GatePolicy, GateReason,
    RoundPhase, RoundRecord, SpeakerGate, Termination, Transition,
};
pub use message::{Causation, Message, MessageLog, RouteRule, RoutingFilter, Target};
pub use participant::{ExpertKind, MODERATOR, Participant, ParticipantRole, Roster};
pub use prompt::{ExpertBrief, PromptTemplate};
pub use transcript::{TranscriptLine, TranscriptParseError};
