//! Per-participant visibility rules

use super::entities::{Causation, Message};
use crate::participant::Participant;

/// The rule that admitted a message into a participant's view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRule {
    /// Addressed to everyone
    Broadcast,
    /// Participant is an explicit recipient
    Addressed,
    /// Coordinator receives everything experts say
    FromExpert,
    /// Everyone receives proposal broadcasts
    Proposal,
    /// Experts receive coordinator revisions
    Revision,
}

/// Decides which messages enter a participant's visible memory.
///
/// Rules are tried in order and the first match wins:
///
/// 1. broadcast target
/// 2. participant named in the target set
/// 3. coordinator: origin is an expert, or the message is a proposal broadcast
/// 4. expert: the message is a coordinator revision or a proposal broadcast
/// 5. otherwise rejected
///
/// Filtering is pure; replaying it over the same log yields the same view.
pub struct RoutingFilter;

impl RoutingFilter {
    /// Which rule admits `message` for `participant`, if any
    pub fn route(participant: &Participant, message: &Message) -> Option<RouteRule> {
        if message.target().is_broadcast() {
            return Some(RouteRule::Broadcast);
        }
        if message.target().names(participant.name()) {
            return Some(RouteRule::Addressed);
        }
        if participant.is_coordinator() {
            if message.from_expert() {
                return Some(RouteRule::FromExpert);
            }
            if message.causation() == Causation::InitialProposal {
                return Some(RouteRule::Proposal);
            }
        } else {
            match message.causation() {
                Causation::CoordinatorRevision => return Some(RouteRule::Revision),
                Causation::InitialProposal => return Some(RouteRule::Proposal),
                Causation::ExpertFeedback => {}
            }
        }
        None
    }

    pub fn accepts(participant: &Participant, message: &Message) -> bool {
        Self::route(participant, message).is_some()
    }

    /// The participant's private memory over `messages`.
    ///
    /// A participant always remembers what it said itself; everything else
    /// passes through [`RoutingFilter::route`].
    pub fn visible<'a>(participant: &Participant, messages: &'a [Message]) -> Vec<&'a Message> {
        messages
            .iter()
            .filter(|m| m.origin() == participant.name() || Self::accepts(participant, m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Target;
    use crate::participant::{ExpertKind, ParticipantRole, Roster};

    fn roster() -> Roster {
        Roster::default_council()
    }

    fn economist(roster: &Roster) -> &Participant {
        roster.get("economist").unwrap()
    }

    #[test]
    fn test_broadcast_accepted_by_everyone() {
        let roster = roster();
        let msgs = [
            Message::proposal_broadcast("p", 1),
            Message::coordinator_revision(roster.coordinator(), "r", 1),
            Message::new(
                "note",
                "economist",
                Some(ParticipantRole::Expert(ExpertKind::Economic)),
                Causation::ExpertFeedback,
                Target::Broadcast,
                1,
            ),
        ];
        for msg in &msgs {
            for p in roster.participants() {
                assert_eq!(RoutingFilter::route(p, msg), Some(RouteRule::Broadcast));
            }
        }
    }

    #[test]
    fn test_expert_feedback_reaches_only_coordinator() {
        let roster = roster();
        let msg = Message::expert_feedback(
            economist(&roster),
            roster.coordinator().name(),
            "cost too high",
            1,
        );

        assert_eq!(
            RoutingFilter::route(roster.coordinator(), &msg),
            Some(RouteRule::Addressed)
        );
        for expert in roster.experts() {
            assert!(!RoutingFilter::accepts(expert, &msg), "{}", expert.name());
        }
    }

    #[test]
    fn test_explicit_target_admits_named_expert() {
        let roster = roster();
        let msg = Message::new(
            "question for legal",
            "economist",
            Some(ParticipantRole::Expert(ExpertKind::Economic)),
            Causation::ExpertFeedback,
            Target::to("compliance-lawyer"),
            1,
        );
        let lawyer = roster.get("compliance-lawyer").unwrap();
        assert_eq!(RoutingFilter::route(lawyer, &msg), Some(RouteRule::Addressed));
        assert!(!RoutingFilter::accepts(roster.get("logistics").unwrap(), &msg));
        // Coordinator is not named but hears every expert
        assert_eq!(
            RoutingFilter::route(roster.coordinator(), &msg),
            Some(RouteRule::FromExpert)
        );
    }

    #[test]
    fn test_targeted_revision_reaches_experts_by_role() {
        let roster = roster();
        let msg = Message::new(
            "REVISED PROPOSAL: x",
            "policy-office",
            Some(ParticipantRole::Coordinator),
            Causation::CoordinatorRevision,
            Target::to("economist"),
            2,
        );
        let logistics = roster.get("logistics").unwrap();
        assert_eq!(RoutingFilter::route(logistics, &msg), Some(RouteRule::Revision));
    }

    #[test]
    fn test_targeted_proposal_reaches_everyone_by_role() {
        let roster = roster();
        let msg = Message::new(
            "p",
            "moderator",
            None,
            Causation::InitialProposal,
            Target::to("nobody"),
            1,
        );
        for p in roster.participants() {
            assert_eq!(RoutingFilter::route(p, &msg), Some(RouteRule::Proposal));
        }
    }

    #[test]
    fn test_visible_includes_own_messages() {
        let roster = roster();
        let economist = economist(&roster);
        let messages = vec![
            Message::proposal_broadcast("p", 1),
            Message::expert_feedback(economist, "policy-office", "mine", 1),
            Message::expert_feedback(roster.get("logistics").unwrap(), "policy-office", "theirs", 1),
            Message::coordinator_revision(roster.coordinator(), "r", 1),
        ];

        let view: Vec<_> = RoutingFilter::visible(economist, &messages)
            .iter()
            .map(|m| m.content())
            .collect();
        assert_eq!(view, vec!["p", "mine", "r"]);

        let coordinator_view = RoutingFilter::visible(roster.coordinator(), &messages);
        assert_eq!(coordinator_view.len(), 4);
    }

    #[test]
    fn test_visible_is_idempotent() {
        let roster = roster();
        let messages = vec![
            Message::proposal_broadcast("p", 1),
            Message::expert_feedback(economist(&roster), "policy-office", "f", 1),
        ];
        let first = RoutingFilter::visible(economist(&roster), &messages);
        let second = RoutingFilter::visible(economist(&roster), &messages);
        assert_eq!(first, second);
    }
}
