//! Participant entity

use super::role::{ExpertKind, ParticipantRole};
use serde::{Deserialize, Serialize};

/// An actor in one deliberation run.
///
/// Participants are created when a run starts and dropped when it ends.
/// Their private memory is not stored here: it is the subsequence of the
/// message log selected by [`RoutingFilter::visible`](crate::message::RoutingFilter::visible).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    name: String,
    title: String,
    role: ParticipantRole,
    weight: f64,
    keywords: Vec<String>,
}

impl Participant {
    /// Create the coordinating participant
    pub fn coordinator(name: impl Into<String>, title: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            role: ParticipantRole::Coordinator,
            weight,
            keywords: Vec::new(),
        }
    }

    /// Create an expert with the kind's default weight and keywords
    pub fn expert(name: impl Into<String>, title: impl Into<String>, kind: ExpertKind) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            weight: kind.default_weight(),
            keywords: kind.default_keywords(),
            role: ParticipantRole::Expert(kind),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Professional title used in prompts (e.g. "chief economist")
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn role(&self) -> &ParticipantRole {
        &self.role
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_coordinator(&self) -> bool {
        self.role.is_coordinator()
    }

    pub fn is_expert(&self) -> bool {
        self.role.is_expert()
    }
}
