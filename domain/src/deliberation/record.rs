//! Per-round snapshot

use super::gate::GateDecision;
use crate::consensus::ConsensusAnalysis;
use serde::{Deserialize, Serialize};

/// What happened in one round. Created once the round is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    /// Gate outcome for every expert, in roster order
    pub gate: Vec<GateDecision>,
    /// Experts whose contribution produced usable output
    pub contributors: Vec<String>,
    /// Experts whose contribution was replaced by a failure notice
    pub failed_contributors: Vec<String>,
    /// A revision message was appended this round
    pub revised: bool,
    /// The revision call failed and a failure notice was appended instead
    pub revision_failed: bool,
    pub analysis: ConsensusAnalysis,
}

impl RoundRecord {
    /// Experts the gate let through, whether or not they succeeded
    pub fn speaker_count(&self) -> usize {
        self.gate.iter().filter(|d| d.speaks()).count()
    }
}
