//! The fixed set of participants for one run

use super::entities::Participant;
use super::role::ExpertKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identity used for proposal broadcasts; reserved, never a participant.
pub const MODERATOR: &str = "moderator";

/// Exactly one coordinator plus any number of experts (Entity)
///
/// # Example
///
/// ```
/// use council_domain::participant::{ExpertKind, Participant, Roster};
///
/// let roster = Roster::new(
///     Participant::coordinator("policy-office", "senior policy maker", 0.5),
///     vec![Participant::expert("economist", "chief economist", ExpertKind::Economic)],
/// )
/// .unwrap();
/// assert_eq!(roster.experts().len(), 1);
/// assert!((roster.total_weight() - 0.65).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    coordinator: Participant,
    experts: Vec<Participant>,
}

impl Roster {
    /// Build a validated roster.
    ///
    /// Names must be unique, non-empty, free of the transcript delimiter
    /// `|` and line breaks, and must not collide with [`MODERATOR`].
    /// Weights must be finite and non-negative, and every expert must weigh
    /// strictly less than the coordinator.
    pub fn new(coordinator: Participant, experts: Vec<Participant>) -> Result<Self, DomainError> {
        if !coordinator.is_coordinator() {
            return Err(DomainError::RoleMismatch(coordinator.name().to_string()));
        }
        if let Some(p) = experts.iter().find(|p| !p.is_expert()) {
            return Err(DomainError::RoleMismatch(p.name().to_string()));
        }

        let mut seen = HashSet::new();
        for p in std::iter::once(&coordinator).chain(experts.iter()) {
            validate_name(p.name())?;
            if !p.weight().is_finite() || p.weight() < 0.0 {
                return Err(DomainError::InvalidWeight {
                    name: p.name().to_string(),
                    weight: p.weight(),
                });
            }
            if !seen.insert(p.name()) {
                return Err(DomainError::DuplicateParticipant(p.name().to_string()));
            }
        }

        let coordinator_weight = coordinator.weight();
        if let Some(p) = experts.iter().find(|p| p.weight() >= coordinator_weight) {
            return Err(DomainError::CoordinatorNotDominant {
                expert: p.name().to_string(),
                weight: p.weight(),
                coordinator_weight,
            });
        }

        Ok(Self {
            coordinator,
            experts,
        })
    }

    /// The default seven-member council for low-altitude economy policy
    pub fn default_council() -> Self {
        let experts = vec![
            Participant::expert("economist", "chief economist", ExpertKind::Economic),
            Participant::expert(
                "compliance-lawyer",
                "aviation regulation lawyer",
                ExpertKind::Legal,
            ),
            Participant::expert(
                "environmentalist",
                "environmental scientist",
                ExpertKind::Environmental,
            ),
            Participant::expert(
                "manufacturer",
                "drone production director",
                ExpertKind::Manufacturing,
            ),
            Participant::expert("logistics", "air logistics director", ExpertKind::Logistics),
            Participant::expert(
                "infrastructure",
                "infrastructure development manager",
                ExpertKind::Infrastructure,
            ),
        ];
        Self {
            coordinator: Participant::coordinator("policy-office", "senior policy maker", 0.35),
            experts,
        }
    }

    pub fn coordinator(&self) -> &Participant {
        &self.coordinator
    }

    pub fn experts(&self) -> &[Participant] {
        &self.experts
    }

    /// Coordinator first, then experts in roster order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        std::iter::once(&self.coordinator).chain(self.experts.iter())
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants().find(|p| p.name() == name)
    }

    /// Scorer weight for `name`; zero for anyone outside the roster
    pub fn weight_of(&self, name: &str) -> f64 {
        self.get(name).map(Participant::weight).unwrap_or(0.0)
    }

    pub fn total_weight(&self) -> f64 {
        self.participants().map(Participant::weight).sum()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::default_council()
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains('|') {
        Some("name contains the transcript delimiter '|'")
    } else if name.contains(['\n', '\r']) {
        Some("name contains a line break")
    } else if name == MODERATOR {
        Some("name is reserved for proposal broadcasts")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(DomainError::InvalidParticipantName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
