//! Prompt templates for deliberation participants

use crate::core::proposal::ProposalFormat;
use crate::deliberation::GatePolicy;
use crate::message::Message;
use crate::participant::{ExpertKind, Participant};
use crate::util::excerpt;

/// Agreement scale every participant is asked to report on
const AGREEMENT_SCALE: &str = "strongly oppose / oppose / neutral / agree / strongly agree";

/// How an expert kind reviews a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpertBrief {
    /// Viewpoint the expert represents
    pub perspective: &'static str,
    /// Tensions the expert must weigh
    pub tensions: &'static [&'static str],
    /// Heading for the expert's list of problems
    pub issue_heading: &'static str,
    /// Label of the 1-10 rating line
    pub score_label: &'static str,
}

impl ExpertBrief {
    pub fn for_kind(kind: &ExpertKind) -> Self {
        match kind {
            ExpertKind::Economic => Self {
                perspective: "macro and industrial economics",
                tensions: &[
                    "short-term returns against long-term industry health",
                    "local interests against overall economic benefit",
                    "free competition against necessary regulatory intervention",
                    "investment cost against expected return",
                ],
                issue_heading: "Key economic issues",
                score_label: "Economic viability score",
            },
            ExpertKind::Legal => Self {
                perspective: "legal compliance and regulatory risk",
                tensions: &[
                    "regulatory certainty against room for innovation",
                    "existing statutes against new operating models",
                    "liability allocation against operator burden",
                ],
                issue_heading: "Key compliance issues",
                score_label: "Compliance score",
            },
            ExpertKind::Environmental => Self {
                perspective: "environmental protection and public health",
                tensions: &[
                    "industry growth against noise and pollution",
                    "emission targets against operating cost",
                    "ecological protection against land and airspace use",
                ],
                issue_heading: "Key environmental issues",
                score_label: "Environmental acceptability score",
            },
            ExpertKind::Manufacturing => Self {
                perspective: "manufacturing feasibility and product certification",
                tensions: &[
                    "technical standards against production cost",
                    "certification rigour against time to market",
                    "domestic supply chains against open sourcing",
                ],
                issue_heading: "Key manufacturing issues",
                score_label: "Manufacturing feasibility score",
            },
            ExpertKind::Logistics => Self {
                perspective: "logistics operations and delivery efficiency",
                tensions: &[
                    "airspace access against safety separation",
                    "operating efficiency against compliance overhead",
                    "network coverage against route profitability",
                ],
                issue_heading: "Key operational issues",
                score_label: "Operational feasibility score",
            },
            ExpertKind::Infrastructure => Self {
                perspective: "infrastructure build-out and monitoring systems",
                tensions: &[
                    "construction cost against coverage",
                    "shared platforms against proprietary systems",
                    "monitoring depth against privacy and cost",
                ],
                issue_heading: "Key infrastructure issues",
                score_label: "Infrastructure readiness score",
            },
            ExpertKind::Custom(_) => Self {
                perspective: "your professional domain",
                tensions: &[
                    "benefits against costs",
                    "short-term feasibility against long-term goals",
                ],
                issue_heading: "Key issues",
                score_label: "Acceptability score",
            },
        }
    }
}

/// Templates for every completion call of a deliberation
pub struct PromptTemplate;

impl PromptTemplate {
    /// Visible memory rendered as `name: content` lines
    pub fn context(memory: &[&Message]) -> String {
        memory
            .iter()
            .map(|m| format!("{}: {}", m.origin(), m.content()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Expert review of the latest proposal, addressed to the coordinator
    pub fn expert_feedback(expert: &Participant, memory: &[&Message]) -> String {
        let brief = match expert.role().expert_kind() {
            Some(kind) => ExpertBrief::for_kind(kind),
            None => ExpertBrief::for_kind(&ExpertKind::Custom(String::new())),
        };
        let tensions = brief
            .tensions
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"## Role
You are {title} ({name}), taking part in a policy deliberation on behalf of {perspective}.
When assessing the proposal, weigh:
{tensions}

## Rules
1. Base every conclusion on evidence or measurable indicators.
2. Check what you said before and do not repeat issues you already raised.
3. Focus on new or unresolved problems in the latest revision only.
4. Keep the summary short and concrete.

## Discussion so far
{context}

## Task
1. List 1-3 new or worsened issues, with their impact.
2. Propose 1-2 specific, actionable improvements and their expected effect.
3. Rate the proposal from 1 to 10 and state your agreement level.
   Scale: 1-2 strongly oppose, 3-4 oppose, 5-6 neutral, 7-8 agree, 9-10 strongly agree.

## Output format
{issue_heading}:
1. [issue and impact]

Suggested improvements:
- [improvement and expected effect]

{score_label}: [X/10]
Agreement level: [{scale}]"#,
            title = expert.title(),
            name = expert.name(),
            perspective = brief.perspective,
            tensions = tensions,
            context = Self::context(memory),
            issue_heading = brief.issue_heading,
            score_label = brief.score_label,
            scale = AGREEMENT_SCALE,
        )
    }

    /// Coordinator revision in the marker format the scorer recognises
    pub fn coordinator_revision(
        coordinator: &Participant,
        memory: &[&Message],
        format: &ProposalFormat,
        max_changes: usize,
    ) -> String {
        format!(
            r#"## Role
You are {title} ({name}), the lead policy maker. You own the proposal and revise it
in response to expert feedback. Weigh:
- policy stability against market flexibility
- expert recommendations against implementation feasibility
- short-term feasibility against long-term goals
- regulatory strictness against room for innovation

## Rules
1. Keep the core of the proposal continuous; retain most of its wording.
2. Every change must be justified, traceable to feedback, and implementable.
3. Make at most {max_changes} key changes.
4. Do not concede on principle merely to win agreement.

## Discussion so far
{context}

## Task
1. Resolve at least two key issues or conflicts raised in the feedback.
2. For each change, state the rationale and expected impact.
3. Output the full revised proposal followed by the list of changes.
4. Close with your agreement level on the revised proposal.

## Output format
{revision_marker}
[full proposal text]

{changes_marker}
1. [change, rationale, source of feedback]
2. [change, rationale, source of feedback]

Agreement level: [{scale}]"#,
            title = coordinator.title(),
            name = coordinator.name(),
            max_changes = max_changes,
            context = Self::context(memory),
            revision_marker = format.revision_marker,
            changes_marker = format.changes_marker,
            scale = AGREEMENT_SCALE,
        )
    }

    /// Strict speak-or-pass question over the recent window
    pub fn speak_confirmation(expert: &Participant, memory: &[&Message], gate: &GatePolicy) -> String {
        let start = memory.len().saturating_sub(gate.relevance_window);
        let recent = memory[start..]
            .iter()
            .map(|m| format!("{}: {}", m.origin(), excerpt(m.content(), gate.context_excerpt_chars)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"## Role
You are {title} ({name}), taking part in a policy deliberation.

## Recent discussion
{recent}

## Task
Decide strictly whether you need to speak this round. Speak only if:
1. The proposal raises a new problem or major risk in your domain, or
2. A core issue you raised earlier is still completely unresolved, or
3. The revision now violates a principle of your profession.

Do not speak if your suggestions were already partly adopted, if another
expert already raised your concern, or if the discussion is outside your domain.

## Output format
Reply with exactly one word: {yes} or {no}."#,
            title = expert.title(),
            name = expert.name(),
            recent = recent,
            yes = gate.affirmative_token,
            no = gate.negative_token,
        )
    }
}
