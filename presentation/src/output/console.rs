//! Console output formatter for deliberation outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::util::excerpt;
use council_domain::{DeliberationOutcome, GateDecision, Message, RoundRecord, Termination};

/// Characters of each message shown in the full report
const MESSAGE_PREVIEW_CHARS: usize = 400;

/// Formats deliberation outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete outcome, round by round
    pub fn format(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Policy Council Deliberation"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Proposal:".cyan().bold(),
            outcome.initial_proposal
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Budget:".cyan().bold(),
            outcome.budget
        ));

        for record in &outcome.records {
            output.push_str(&Self::section_header(&format!("Round {}", record.round)));
            output.push_str(&Self::gate_lines(&record.gate));
            output.push('\n');
            for message in outcome.messages.iter().filter(|m| m.round() == record.round) {
                output.push_str(&Self::message_block(message));
            }
            output.push_str(&Self::round_score(record));
        }

        let versions = outcome.versions();
        if !versions.is_empty() {
            output.push_str(&Self::section_header("Proposal Versions"));
            for version in versions {
                let divergence = match version.divergence {
                    Some(d) => format!("divergence {:.2}", d),
                    None => "first version".to_string(),
                };
                let marker = if version.substantial {
                    "substantial".green().to_string()
                } else {
                    "minor".dimmed().to_string()
                };
                output.push_str(&format!(
                    "  v{} (round {}, {}, {})\n",
                    version.index, version.round, divergence, marker
                ));
            }
        }

        output.push_str(&Self::verdict(outcome));
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DeliberationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Verdict, score and final proposal
    pub fn format_summary(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\n\n",
            "=== Policy Council Verdict ===".cyan().bold()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Proposal:".bold(),
            outcome.initial_proposal
        ));
        output.push_str(&Self::verdict(outcome));
        output.push_str(&format!(
            "\n{}\n{}\n",
            "Final proposal:".cyan().bold(),
            outcome.final_proposal
        ));
        output
    }

    fn verdict(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();
        let status = match outcome.termination {
            Termination::ConsensusReached => "Consensus reached".green().bold(),
            Termination::RoundCeiling => "No consensus".yellow().bold(),
            Termination::Cancelled => "Cancelled".red().bold(),
        };
        output.push_str(&format!(
            "\n{} after {} round(s)\n",
            status, outcome.rounds_completed
        ));
        output.push_str(&format!(
            "  score {:.1}  (+{:.2} / -{:.2}, neutral {:.2})\n",
            outcome.analysis.score,
            outcome.analysis.positive,
            outcome.analysis.negative,
            outcome.analysis.neutral
        ));
        output.push_str(&format!(
            "  {} version(s), {} substantial\n",
            outcome.version_count(),
            outcome.analysis.substantial_changes
        ));

        if !outcome.unmet.is_empty() {
            output.push_str(&format!("\n{}\n", "Unmet:".yellow().bold()));
            for gate in &outcome.unmet {
                output.push_str(&format!("  * {}\n", gate));
            }
        }
        if !outcome.analysis.issues.is_empty() {
            output.push_str(&format!("\n{}\n", "Open issues:".yellow().bold()));
            for issue in &outcome.analysis.issues {
                output.push_str(&format!("  * {}\n", issue));
            }
        }
        output
    }

    fn gate_lines(gate: &[GateDecision]) -> String {
        gate.iter()
            .map(|d| {
                let mark = if d.speaks() { "+".green() } else { "-".dimmed() };
                format!("  {} {}: {}\n", mark, d.expert, d.reason)
            })
            .collect()
    }

    fn message_block(message: &Message) -> String {
        let heading = format!("── {} ({}) ──", message.origin(), message.causation());
        let heading = if message.from_coordinator() {
            heading.cyan().bold()
        } else {
            heading.yellow().bold()
        };
        format!(
            "\n{}\n{}\n",
            heading,
            Self::indent(&excerpt(message.content(), MESSAGE_PREVIEW_CHARS), "  ")
        )
    }

    fn round_score(record: &RoundRecord) -> String {
        let mut line = format!(
            "\n  {} {:.1}",
            "score".bold(),
            record.analysis.score
        );
        if !record.failed_contributors.is_empty() {
            line.push_str(&format!(
                "  {} {}",
                "failed:".red(),
                record.failed_contributors.join(", ")
            ));
        }
        if record.revision_failed {
            line.push_str(&format!("  {}", "revision failed".red()));
        }
        line.push('\n');
        line
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, outcome: &DeliberationOutcome) -> String {
        Self::format(outcome)
    }

    fn format_summary(&self, outcome: &DeliberationOutcome) -> String {
        Self::format_summary(outcome)
    }

    fn format_json(&self, outcome: &DeliberationOutcome) -> String {
        Self::format_json(outcome)
    }
}
