//! Result of a complete deliberation run

use super::phase::Termination;
use super::record::RoundRecord;
use crate::consensus::{ConsensusAnalysis, ProposalVersion, UnmetGate};
use crate::message::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationOutcome {
    pub initial_proposal: String,
    /// Extracted text of the latest successful revision
    pub final_proposal: String,
    pub termination: Termination,
    /// Rounds that were fully scored
    pub rounds_completed: u32,
    /// Discussion budget supplied by the caller; carried through untouched
    pub budget: f64,
    /// Analysis of the last scored round
    pub analysis: ConsensusAnalysis,
    /// Gates that blocked consensus; empty when it was reached
    pub unmet: Vec<UnmetGate>,
    pub records: Vec<RoundRecord>,
    pub messages: Vec<Message>,
}

impl DeliberationOutcome {
    pub fn reached(&self) -> bool {
        self.termination.is_consensus()
    }

    pub fn versions(&self) -> &[ProposalVersion] {
        &self.analysis.versions
    }

    pub fn version_count(&self) -> usize {
        self.analysis.versions.len()
    }
}
