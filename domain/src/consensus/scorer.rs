//! Consensus scorer
//!
//! Turns the full message log into a [`ConsensusAnalysis`]. The scorer is a
//! total function of `(messages, round)`: it never fails and an empty log
//! yields [`ConsensusAnalysis::empty`].

use super::analysis::{ConsensusAnalysis, ProposalVersion};
use super::criteria::ConsensusCriteria;
use super::divergence::divergence;
use super::stance::{Stance, StanceClassifier};
use super::vocabulary::StanceVocabulary;
use crate::core::proposal::ProposalFormat;
use crate::message::Message;
use crate::participant::Roster;
use std::collections::HashMap;

/// Weighted multi-criteria consensus scorer
#[derive(Debug, Clone)]
pub struct ConsensusScorer {
    weights: HashMap<String, f64>,
    total_weight: f64,
    format: ProposalFormat,
    vocabulary: StanceVocabulary,
    criteria: ConsensusCriteria,
}

impl ConsensusScorer {
    pub fn new(
        roster: &Roster,
        format: ProposalFormat,
        vocabulary: &StanceVocabulary,
        criteria: ConsensusCriteria,
    ) -> Self {
        let weights = roster
            .participants()
            .map(|p| (p.name().to_string(), p.weight()))
            .collect();
        Self {
            weights,
            total_weight: roster.total_weight(),
            format,
            vocabulary: vocabulary.normalized(),
            criteria,
        }
    }

    pub fn criteria(&self) -> &ConsensusCriteria {
        &self.criteria
    }

    /// Weight of a message origin; anyone outside the roster weighs nothing
    fn weight_of(&self, origin: &str) -> f64 {
        self.weights.get(origin).copied().unwrap_or(0.0)
    }

    /// Score the complete log as of `round`
    pub fn analyze(&self, messages: &[Message], round: u32) -> ConsensusAnalysis {
        let mut analysis = ConsensusAnalysis::empty(round, &self.criteria);
        if messages.is_empty() {
            return analysis;
        }

        analysis.versions = self.versions(messages);
        analysis.substantial_changes = analysis.versions.iter().filter(|v| v.substantial).count();
        analysis.meets_change_requirement =
            self.criteria.meets_changes(analysis.substantial_changes);

        let classifier = StanceClassifier::new(&self.vocabulary);
        let mut objections: Vec<String> = Vec::new();
        for message in messages {
            let weight = self.weight_of(message.origin());
            let content = message.content().to_lowercase();
            let stance = classifier.classify_lowered(&content);
            match stance {
                Stance::Positive(_) => analysis.positive += f64::from(stance.points()) * weight,
                Stance::Negative(_) => {
                    analysis.negative += f64::from(stance.points()) * weight;
                    objections.push(content);
                }
                Stance::Neutral => analysis.neutral += weight,
            }
        }

        analysis.score = self.aggregate(analysis.positive, analysis.negative);
        if analysis.negative > 0.0 {
            analysis.issues = self.extract_issues(&objections);
        }
        analysis
    }

    /// Shorthand for the configured criteria check
    pub fn reached(&self, analysis: &ConsensusAnalysis) -> bool {
        self.criteria.reached(analysis)
    }

    /// `positive / (Σw·2) · 100 − negative / (Σw·2) · 20`, clamped to `[0, 100]`
    fn aggregate(&self, positive: f64, negative: f64) -> f64 {
        let max_possible = self.total_weight * 2.0;
        if max_possible <= 0.0 || !max_possible.is_finite() {
            return 0.0;
        }
        let raw = positive / max_possible * 100.0 - negative / max_possible * 20.0;
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 100.0) }
    }

    fn versions(&self, messages: &[Message]) -> Vec<ProposalVersion> {
        let mut versions: Vec<ProposalVersion> = Vec::new();
        for message in messages
            .iter()
            .filter(|m| m.from_coordinator() && self.format.is_version(m.content()))
        {
            let text = self.format.extract_text(message.content()).to_string();
            let divergence = versions.last().map(|prev| divergence(&prev.text, &text));
            versions.push(ProposalVersion {
                index: versions.len() + 1,
                round: message.round(),
                author: message.origin().to_string(),
                substantial: divergence.is_some_and(|d| self.criteria.is_substantial(d)),
                divergence,
                text,
            });
        }
        versions
    }

    /// Trailing reason clauses of the given lowercased objections.
    ///
    /// For each objection the first issue marker (in vocabulary order) whose
    /// trailing clause is long enough wins. Results keep first-seen order.
    fn extract_issues(&self, objections: &[String]) -> Vec<String> {
        let mut issues: Vec<String> = Vec::new();
        for content in objections {
            for marker in self.vocabulary.issue_markers.iter().filter(|m| !m.is_empty()) {
                let Some(idx) = content.rfind(marker.as_str()) else {
                    continue;
                };
                let clause = content[idx + marker.len()..].trim();
                if clause.split_whitespace().count() >= self.vocabulary.min_issue_words {
                    let issue = capitalize(clause);
                    if !issues.contains(&issue) {
                        issues.push(issue);
                    }
                    break;
                }
            }
        }
        issues
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
