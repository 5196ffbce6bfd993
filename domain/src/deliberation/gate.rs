//! Speaker-selection gate
//!
//! Each expert decides once per round whether to contribute. The decision
//! runs in three local steps (empty memory, cooldown, relevance) and, when
//! those pass, a confirmation question to the completion service which the
//! caller performs and feeds back through [`SpeakerGate::interpret_confirmation`].

use crate::message::Message;
use crate::participant::Participant;
use crate::util::prefix_chars;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for the speaker gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePolicy {
    /// How many recent visible messages the cooldown scan covers
    pub cooldown_window: usize,
    /// Streak of marked self-messages that triggers the cooldown draw
    pub cooldown_streak: usize,
    /// Words that mark a message as a substantive contribution
    pub cooldown_markers: Vec<String>,
    /// Chance of speaking anyway once the cooldown triggers
    pub cooldown_speak_probability: f64,
    /// How many recent visible messages to search for the coordinator's text
    pub relevance_window: usize,
    /// Leading characters of the coordinator's text matched against keywords
    pub relevance_prefix_chars: usize,
    /// Literal marker that ends the cooldown scan
    pub round_separator: String,
    pub affirmative_token: String,
    pub negative_token: String,
    /// Per-message excerpt length in the confirmation prompt
    pub context_excerpt_chars: usize,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            cooldown_window: 10,
            cooldown_streak: 2,
            cooldown_markers: ["问题", "建议", "修改", "评分", "issue", "suggest", "change", "score"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cooldown_speak_probability: 0.3,
            relevance_window: 5,
            relevance_prefix_chars: 500,
            round_separator: "==================".to_string(),
            affirmative_token: "SPEAK".to_string(),
            negative_token: "PASS".to_string(),
            context_excerpt_chars: 200,
        }
    }
}

impl GatePolicy {
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(0.0..=1.0).contains(&self.cooldown_speak_probability) {
            problems.push(format!(
                "cooldown_speak_probability must be within 0..=1, got {}",
                self.cooldown_speak_probability
            ));
        }
        if self.affirmative_token.trim().is_empty() {
            problems.push("affirmative_token must not be empty".to_string());
        }
        let negative = self.negative_token.trim().to_uppercase();
        if !negative.is_empty() && self.affirmative_token.to_uppercase().contains(&negative) {
            problems.push(format!(
                "affirmative_token '{}' contains the negative token",
                self.affirmative_token
            ));
        }
        problems
    }
}

/// Why an expert will or will not speak this round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateReason {
    /// Nothing visible yet; always speak
    FirstRound,
    /// Confirmation answered affirmatively
    Confirmed { relevance: usize, streak: usize },
    /// Skipped after speaking repeatedly
    Cooldown { streak: usize },
    /// Coordinator's latest text touches none of the expert's keywords
    Irrelevant,
    /// Confirmation answered negatively
    Declined { relevance: usize, streak: usize },
    /// Confirmation call failed; fail closed
    ServiceFailure { error: String },
}

impl GateReason {
    pub fn speaks(&self) -> bool {
        matches!(self, GateReason::FirstRound | GateReason::Confirmed { .. })
    }
}

impl std::fmt::Display for GateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateReason::FirstRound => write!(f, "first round"),
            GateReason::Confirmed { relevance, streak } => {
                write!(f, "confirmed (relevance {}, streak {})", relevance, streak)
            }
            GateReason::Cooldown { streak } => write!(f, "cooling down after {} turns", streak),
            GateReason::Irrelevant => write!(f, "no domain keywords in latest revision"),
            GateReason::Declined { relevance, streak } => {
                write!(f, "declined (relevance {}, streak {})", relevance, streak)
            }
            GateReason::ServiceFailure { error } => write!(f, "confirmation failed: {}", error),
        }
    }
}

/// Gate outcome for one expert in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub expert: String,
    #[serde(flatten)]
    pub reason: GateReason,
}

impl GateDecision {
    pub fn new(expert: impl Into<String>, reason: GateReason) -> Self {
        Self {
            expert: expert.into(),
            reason,
        }
    }

    pub fn speaks(&self) -> bool {
        self.reason.speaks()
    }
}

/// Result of the local gate steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCheck {
    /// Decided without the completion service
    Decided(GateReason),
    /// Local checks passed; ask the expert to confirm
    Confirm { relevance: usize, streak: usize },
}

/// Evaluates the gate heuristics over an expert's visible memory.
///
/// Pure apart from the injected random source, so the same memory and the
/// same seed always give the same result.
pub struct SpeakerGate<'a> {
    policy: &'a GatePolicy,
}

impl<'a> SpeakerGate<'a> {
    pub fn new(policy: &'a GatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GatePolicy {
        self.policy
    }

    /// Run the local steps for `expert` over its visible `memory`.
    ///
    /// Draws from `rng` only when the cooldown streak triggers.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        expert: &Participant,
        memory: &[&Message],
        rng: &mut R,
    ) -> GateCheck {
        if memory.is_empty() {
            return GateCheck::Decided(GateReason::FirstRound);
        }

        let streak = self.cooldown_streak(expert, memory);
        if streak >= self.policy.cooldown_streak {
            let draw: f64 = rng.r#gen();
            if draw > self.policy.cooldown_speak_probability {
                return GateCheck::Decided(GateReason::Cooldown { streak });
            }
        }

        let relevance = self.relevance(expert, memory);
        if relevance == 0 {
            return GateCheck::Decided(GateReason::Irrelevant);
        }

        GateCheck::Confirm { relevance, streak }
    }

    /// Count the expert's own marked messages among the newest entries.
    ///
    /// Scans newest to oldest over at most `cooldown_window` messages and
    /// stops at the first message carrying the round separator. Messages by
    /// others are passed over without breaking the count.
    pub fn cooldown_streak(&self, expert: &Participant, memory: &[&Message]) -> usize {
        let start = memory.len().saturating_sub(self.policy.cooldown_window);
        let mut streak = 0;
        for message in memory[start..].iter().rev() {
            if message.origin() == expert.name() && self.is_marked(message.content()) {
                streak += 1;
            } else if !self.policy.round_separator.is_empty()
                && message.content().contains(&self.policy.round_separator)
            {
                break;
            }
        }
        streak
    }

    fn is_marked(&self, content: &str) -> bool {
        let content = content.to_lowercase();
        self.policy
            .cooldown_markers
            .iter()
            .any(|m| !m.is_empty() && content.contains(&m.to_lowercase()))
    }

    /// Number of the expert's keywords found in the coordinator's latest
    /// text within the relevance window
    pub fn relevance(&self, expert: &Participant, memory: &[&Message]) -> usize {
        let start = memory.len().saturating_sub(self.policy.relevance_window);
        let Some(latest) = memory[start..].iter().rev().find(|m| m.from_coordinator()) else {
            return 0;
        };
        let text = prefix_chars(latest.content(), self.policy.relevance_prefix_chars).to_lowercase();
        expert
            .keywords()
            .iter()
            .filter(|kw| !kw.is_empty() && text.contains(&kw.to_lowercase()))
            .count()
    }

    /// Map a confirmation reply to a final reason.
    ///
    /// The negative token wins when both appear, so a reply that mentions
    /// speaking while declining stays silent.
    pub fn interpret_confirmation(&self, reply: &str, relevance: usize, streak: usize) -> GateReason {
        let reply = reply.to_uppercase();
        let negative = self.policy.negative_token.trim().to_uppercase();
        let affirmative = self.policy.affirmative_token.trim().to_uppercase();
        if !negative.is_empty() && reply.contains(&negative) {
            GateReason::Declined { relevance, streak }
        } else if !affirmative.is_empty() && reply.contains(&affirmative) {
            GateReason::Confirmed { relevance, streak }
        } else {
            GateReason::Declined { relevance, streak }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Roster;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn always_low() -> StepRng {
        StepRng::new(0, 0)
    }

    fn always_high() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn fixture() -> (Roster, GatePolicy) {
        (Roster::default_council(), GatePolicy::default())
    }

    fn feedback(roster: &Roster, who: &str, content: &str) -> Message {
        Message::expert_feedback(roster.get(who).unwrap(), "policy-office", content, 1)
    }

    fn revision(roster: &Roster, content: &str) -> Message {
        Message::coordinator_revision(roster.coordinator(), content, 1)
    }

    #[test]
    fn test_empty_memory_speaks_without_drawing() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let mut rng = always_high();
        let check = gate.evaluate(roster.get("economist").unwrap(), &[], &mut rng);
        assert_eq!(check, GateCheck::Decided(GateReason::FirstRound));
    }

    #[test]
    fn test_streak_counts_marked_self_messages() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let economist = roster.get("economist").unwrap();
        let msgs = [
            feedback(&roster, "economist", "建议降低税率"),
            revision(&roster, "REVISED PROPOSAL: x"),
            feedback(&roster, "economist", "issue: financing unclear"),
            feedback(&roster, "economist", "fine by me"),
        ];
        let memory: Vec<&Message> = msgs.iter().collect();
        assert_eq!(gate.cooldown_streak(economist, &memory), 2);
    }

    #[test]
    fn test_streak_stops_at_separator() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let economist = roster.get("economist").unwrap();
        let msgs = [
            feedback(&roster, "economist", "建议 A"),
            Message::proposal_broadcast("================== round 2", 2),
            feedback(&roster, "economist", "建议 B"),
        ];
        let memory: Vec<&Message> = msgs.iter().collect();
        assert_eq!(gate.cooldown_streak(economist, &memory), 1);
    }

    #[test]
    fn test_streak_limited_to_window() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let economist = roster.get("economist").unwrap();
        let mut msgs = vec![
            feedback(&roster, "economist", "建议 A"),
            feedback(&roster, "economist", "建议 B"),
        ];
        for _ in 0..10 {
            msgs.push(revision(&roster, "plain text"));
        }
        let memory: Vec<&Message> = msgs.iter().collect();
        assert_eq!(gate.cooldown_streak(economist, &memory), 0);
    }

    fn cooled_down_memory(roster: &Roster) -> Vec<Message> {
        vec![
            feedback(roster, "economist", "建议 A"),
            feedback(roster, "economist", "建议 B"),
            revision(roster, "REVISED PROPOSAL: 降低投资成本"),
        ]
    }

    #[test]
    fn test_cooldown_skips_on_high_draw() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let msgs = cooled_down_memory(&roster);
        let memory: Vec<&Message> = msgs.iter().collect();
        let check = gate.evaluate(roster.get("economist").unwrap(), &memory, &mut always_high());
        assert_eq!(check, GateCheck::Decided(GateReason::Cooldown { streak: 2 }));
    }

    #[test]
    fn test_cooldown_passes_on_low_draw() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let msgs = cooled_down_memory(&roster);
        let memory: Vec<&Message> = msgs.iter().collect();
        let check = gate.evaluate(roster.get("economist").unwrap(), &memory, &mut always_low());
        // 投资 and 成本 both match
        assert_eq!(
            check,
            GateCheck::Confirm {
                relevance: 2,
                streak: 2
            }
        );
    }

    #[test]
    fn test_same_seed_same_decision() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let msgs = cooled_down_memory(&roster);
        let memory: Vec<&Message> = msgs.iter().collect();
        let economist = roster.get("economist").unwrap();
        for seed in 0..20 {
            let a = gate.evaluate(economist, &memory, &mut StdRng::seed_from_u64(seed));
            let b = gate.evaluate(economist, &memory, &mut StdRng::seed_from_u64(seed));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_irrelevant_without_coordinator_text() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let msgs = [Message::proposal_broadcast("投资 成本 市场", 1)];
        let memory: Vec<&Message> = msgs.iter().collect();
        let check = gate.evaluate(roster.get("economist").unwrap(), &memory, &mut always_low());
        assert_eq!(check, GateCheck::Decided(GateReason::Irrelevant));
    }

    #[test]
    fn test_relevance_uses_latest_coordinator_text_in_window() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let economist = roster.get("economist").unwrap();
        let mut msgs = vec![revision(&roster, "市场 融资")];
        let memory: Vec<&Message> = msgs.iter().collect();
        assert_eq!(gate.relevance(economist, &memory), 2);

        // Pushed out of the five-message window
        for _ in 0..5 {
            msgs.push(feedback(&roster, "logistics", "物流"));
        }
        let memory: Vec<&Message> = msgs.iter().collect();
        assert_eq!(gate.relevance(economist, &memory), 0);
    }

    #[test]
    fn test_relevance_only_reads_prefix() {
        let (roster, policy) = fixture();
        let gate = SpeakerGate::new(&policy);
        let economist = roster.get("economist").unwrap();
        let long = format!("{}投资", "x".repeat(500));
        let msgs = [revision(&roster, &long)];
        let memory: Vec<&Message> = msgs.iter().collect();
        assert_eq!(gate.relevance(economist, &memory), 0);
    }

    #[test]
    fn test_interpret_confirmation() {
        let policy = GatePolicy::default();
        let gate = SpeakerGate::new(&policy);
        assert!(gate.interpret_confirmation("SPEAK", 1, 0).speaks());
        assert!(gate.interpret_confirmation("I will speak.", 1, 0).speaks());
        assert!(!gate.interpret_confirmation("PASS", 1, 0).speaks());
        assert!(!gate.interpret_confirmation("", 1, 0).speaks());
    }

    #[test]
    fn test_negative_token_wins_over_affirmative() {
        let policy = GatePolicy::default();
        let gate = SpeakerGate::new(&policy);
        assert_eq!(
            gate.interpret_confirmation("no need to speak, PASS", 2, 1),
            GateReason::Declined {
                relevance: 2,
                streak: 1
            }
        );
        assert!(!gate.interpret_confirmation("Speak? pass.", 1, 0).speaks());

        // A negative token that extends the affirmative one still declines
        let policy = GatePolicy {
            affirmative_token: "发言".into(),
            negative_token: "不发言".into(),
            ..Default::default()
        };
        let gate = SpeakerGate::new(&policy);
        assert!(gate.interpret_confirmation("发言", 1, 0).speaks());
        assert!(!gate.interpret_confirmation("不发言", 1, 0).speaks());
    }

    #[test]
    fn test_default_policy_has_no_problems() {
        assert!(GatePolicy::default().problems().is_empty());
        let nested = GatePolicy {
            affirmative_token: "GO".into(),
            negative_token: "NO GO".into(),
            ..Default::default()
        };
        assert!(nested.problems().is_empty());
        let bad = GatePolicy {
            affirmative_token: "GO AHEAD".into(),
            negative_token: "GO".into(),
            ..Default::default()
        };
        assert_eq!(bad.problems().len(), 1);
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(GateReason::Cooldown { streak: 2 }.to_string(), "cooling down after 2 turns");
        assert!(GateDecision::new("economist", GateReason::FirstRound).speaks());
    }
}
