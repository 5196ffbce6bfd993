//! Every tunable of a deliberation in one place

use super::gate::GatePolicy;
use crate::consensus::{ConsensusCriteria, ConsensusScorer, StanceVocabulary};
use crate::core::error::DomainError;
use crate::core::proposal::ProposalFormat;
use crate::participant::Roster;
use serde::{Deserialize, Serialize};

/// Fixed vocabularies and thresholds, all overridable from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliberationPolicy {
    pub format: ProposalFormat,
    pub vocabulary: StanceVocabulary,
    pub criteria: ConsensusCriteria,
    pub gate: GatePolicy,
}

impl DeliberationPolicy {
    /// Reject values the scorer or gate cannot work with
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = self.criteria.problems();
        problems.extend(self.gate.problems());
        if self.format.revision_marker.trim().is_empty() {
            problems.push("revision_marker must not be empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidPolicy(problems.join("; ")))
        }
    }

    pub fn scorer(&self, roster: &Roster) -> ConsensusScorer {
        ConsensusScorer::new(
            roster,
            self.format.clone(),
            &self.vocabulary,
            self.criteria.clone(),
        )
    }
}
