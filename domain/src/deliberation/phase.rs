//! Round state machine

use serde::{Deserialize, Serialize};

/// Phases of a single round, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Broadcast,
    Gate,
    Contribute,
    Revise,
    Score,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Broadcast => "broadcast",
            RoundPhase::Gate => "gate",
            RoundPhase::Contribute => "contribute",
            RoundPhase::Revise => "revise",
            RoundPhase::Score => "score",
        }
    }

    /// Phase following this one; `None` after scoring.
    ///
    /// With no gated speakers the round goes straight from gating to
    /// scoring, so a silent round never produces a revision.
    pub fn next(&self, speakers: usize) -> Option<RoundPhase> {
        match self {
            RoundPhase::Broadcast => Some(RoundPhase::Gate),
            RoundPhase::Gate if speakers == 0 => Some(RoundPhase::Score),
            RoundPhase::Gate => Some(RoundPhase::Contribute),
            RoundPhase::Contribute => Some(RoundPhase::Revise),
            RoundPhase::Revise => Some(RoundPhase::Score),
            RoundPhase::Score => None,
        }
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    ConsensusReached,
    /// The round ceiling was hit without consensus
    RoundCeiling,
    /// Aborted externally at a phase boundary
    Cancelled,
}

impl Termination {
    pub fn is_consensus(&self) -> bool {
        matches!(self, Termination::ConsensusReached)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::ConsensusReached => write!(f, "consensus reached"),
            Termination::RoundCeiling => write!(f, "round ceiling reached without consensus"),
            Termination::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// What happens after a round is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Terminate(Termination),
}

impl Transition {
    /// Decide after scoring `round` out of at most `max_rounds`
    pub fn after_round(reached: bool, round: u32, max_rounds: u32) -> Self {
        if reached {
            Transition::Terminate(Termination::ConsensusReached)
        } else if round >= max_rounds {
            Transition::Terminate(Termination::RoundCeiling)
        } else {
            Transition::Continue
        }
    }
}
