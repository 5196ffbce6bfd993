//! Consensus analysis value objects

use super::criteria::ConsensusCriteria;
use serde::{Deserialize, Serialize};

/// One proposal version derived from a coordinator revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalVersion {
    /// Position in the version sequence, starting at 1
    pub index: usize,
    /// Round in which the revision was emitted
    pub round: u32,
    pub author: String,
    /// Proposal text with preamble and change list stripped
    pub text: String,
    /// Divergence from the previous version; `None` for the first
    pub divergence: Option<f64>,
    pub substantial: bool,
}

/// Result of scoring the whole message log at a given round.
///
/// Always recomputed from the full history, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAnalysis {
    pub round: u32,
    /// Aggregate score in `[0, 100]`
    pub score: f64,
    /// Weighted positive points
    pub positive: f64,
    /// Weighted negative points
    pub negative: f64,
    /// Weighted count of neutral messages (does not enter the score)
    pub neutral: f64,
    pub substantial_changes: usize,
    pub versions: Vec<ProposalVersion>,
    pub meets_round_requirement: bool,
    pub meets_change_requirement: bool,
    /// Unresolved issues pulled from objections, in first-seen order
    pub issues: Vec<String>,
}

impl ConsensusAnalysis {
    /// Zero-valued analysis, as produced for an empty log
    pub fn empty(round: u32, criteria: &ConsensusCriteria) -> Self {
        Self {
            round,
            score: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
            substantial_changes: 0,
            versions: Vec::new(),
            meets_round_requirement: criteria.meets_rounds(round),
            meets_change_requirement: criteria.meets_changes(0),
            issues: Vec::new(),
        }
    }
}
