//! Consensus scoring
//!
//! Stance vocabularies, version divergence, and the weighted scorer that
//! decides whether a deliberation may terminate.

pub mod analysis;
pub mod criteria;
pub mod divergence;
pub mod scorer;
pub mod stance;
pub mod vocabulary;

pub use analysis::{ConsensusAnalysis, ProposalVersion};
pub use criteria::{ConsensusCriteria, UnmetGate};
pub use divergence::{divergence, similarity_ratio};
pub use scorer::ConsensusScorer;
pub use stance::{Intensity, Stance, StanceClassifier};
pub use vocabulary::StanceVocabulary;
