//! Termination criteria for a deliberation

use super::analysis::ConsensusAnalysis;
use serde::{Deserialize, Serialize};

/// Thresholds that must all hold at once for consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusCriteria {
    /// Minimum aggregate score, in `[0, 100]`
    pub score_threshold: f64,
    /// Minimum round index at which consensus may be declared
    pub min_rounds: u32,
    /// Minimum number of substantial proposal changes
    pub min_substantial_changes: usize,
    /// Divergence at or above which a version change is substantial
    pub divergence_threshold: f64,
}

impl Default for ConsensusCriteria {
    fn default() -> Self {
        Self {
            score_threshold: 85.0,
            min_rounds: 5,
            min_substantial_changes: 2,
            divergence_threshold: 0.25,
        }
    }
}

/// A termination condition that was not met
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum UnmetGate {
    Score { score: f64, threshold: f64 },
    Rounds { round: u32, minimum: u32 },
    Changes { count: usize, minimum: usize },
}

impl std::fmt::Display for UnmetGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmetGate::Score { score, threshold } => {
                write!(f, "score {:.1} below threshold {:.1}", score, threshold)
            }
            UnmetGate::Rounds { round, minimum } => {
                write!(f, "round {} below minimum {}", round, minimum)
            }
            UnmetGate::Changes { count, minimum } => {
                write!(f, "{} substantial change(s), {} required", count, minimum)
            }
        }
    }
}

impl ConsensusCriteria {
    pub fn meets_rounds(&self, round: u32) -> bool {
        round >= self.min_rounds
    }

    pub fn meets_changes(&self, substantial_changes: usize) -> bool {
        substantial_changes >= self.min_substantial_changes
    }

    pub fn is_substantial(&self, divergence: f64) -> bool {
        divergence >= self.divergence_threshold
    }

    /// Score, rounds and changes requirements hold simultaneously
    pub fn reached(&self, analysis: &ConsensusAnalysis) -> bool {
        analysis.score >= self.score_threshold
            && analysis.meets_round_requirement
            && analysis.meets_change_requirement
    }

    /// The gates blocking consensus, empty when [`Self::reached`] holds
    pub fn unmet(&self, analysis: &ConsensusAnalysis) -> Vec<UnmetGate> {
        let mut gates = Vec::new();
        if analysis.score < self.score_threshold {
            gates.push(UnmetGate::Score {
                score: analysis.score,
                threshold: self.score_threshold,
            });
        }
        if !analysis.meets_round_requirement {
            gates.push(UnmetGate::Rounds {
                round: analysis.round,
                minimum: self.min_rounds,
            });
        }
        if !analysis.meets_change_requirement {
            gates.push(UnmetGate::Changes {
                count: analysis.substantial_changes,
                minimum: self.min_substantial_changes,
            });
        }
        gates
    }

    /// Human-readable problems with the configured values
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(0.0..=100.0).contains(&self.score_threshold) {
            problems.push(format!(
                "score_threshold must be within 0..=100, got {}",
                self.score_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.divergence_threshold) {
            problems.push(format!(
                "divergence_threshold must be within 0..=1, got {}",
                self.divergence_threshold
            ));
        }
        problems
    }
}
