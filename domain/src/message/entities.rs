//! Message entity

use crate::participant::{MODERATOR, Participant, ParticipantRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which kind of contribution produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Causation {
    /// Proposal text broadcast at the start of a round
    InitialProposal,
    /// An expert's review addressed to the coordinator
    ExpertFeedback,
    /// The coordinator's revised proposal
    CoordinatorRevision,
}

impl Causation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Causation::InitialProposal => "initial_proposal",
            Causation::ExpertFeedback => "expert_feedback",
            Causation::CoordinatorRevision => "coordinator_revision",
        }
    }
}

impl std::fmt::Display for Causation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a message is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Broadcast,
    Recipients(BTreeSet<String>),
}

impl Target {
    pub fn to(name: impl Into<String>) -> Self {
        Target::Recipients(BTreeSet::from([name.into()]))
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self, Target::Broadcast)
    }

    /// Whether `name` is explicitly listed (always false for broadcasts)
    pub fn names(&self, name: &str) -> bool {
        match self {
            Target::Broadcast => false,
            Target::Recipients(set) => set.contains(name),
        }
    }
}

/// Content produced in place of a failed generation.
///
/// Failed contributions stay in the log so the failure is visible to every
/// later reader, including the transcript consumer.
pub fn failure_notice(reason: &str) -> String {
    format!("[generation failed: {}]", reason)
}

/// An immutable entry of the message log (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    content: String,
    origin: String,
    /// `None` for the moderator, who is not a participant
    origin_role: Option<ParticipantRole>,
    causation: Causation,
    target: Target,
    round: u32,
}

impl Message {
    pub fn new(
        content: impl Into<String>,
        origin: impl Into<String>,
        origin_role: Option<ParticipantRole>,
        causation: Causation,
        target: Target,
        round: u32,
    ) -> Self {
        Self {
            content: content.into(),
            origin: origin.into(),
            origin_role,
            causation,
            target,
            round,
        }
    }

    /// Round-opening broadcast of the current proposal text
    pub fn proposal_broadcast(proposal: impl Into<String>, round: u32) -> Self {
        Self::new(
            proposal,
            MODERATOR,
            None,
            Causation::InitialProposal,
            Target::Broadcast,
            round,
        )
    }

    /// Expert review, visible to the coordinator only
    pub fn expert_feedback(
        expert: &Participant,
        coordinator: &str,
        content: impl Into<String>,
        round: u32,
    ) -> Self {
        Self::new(
            content,
            expert.name(),
            Some(expert.role().clone()),
            Causation::ExpertFeedback,
            Target::to(coordinator),
            round,
        )
    }

    /// Coordinator revision, broadcast to everyone
    pub fn coordinator_revision(
        coordinator: &Participant,
        content: impl Into<String>,
        round: u32,
    ) -> Self {
        Self::new(
            content,
            coordinator.name(),
            Some(coordinator.role().clone()),
            Causation::CoordinatorRevision,
            Target::Broadcast,
            round,
        )
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn origin_role(&self) -> Option<&ParticipantRole> {
        self.origin_role.as_ref()
    }

    pub fn causation(&self) -> Causation {
        self.causation
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn from_coordinator(&self) -> bool {
        self.origin_role
            .as_ref()
            .is_some_and(ParticipantRole::is_coordinator)
    }

    pub fn from_expert(&self) -> bool {
        self.origin_role.as_ref().is_some_and(ParticipantRole::is_expert)
    }
}
