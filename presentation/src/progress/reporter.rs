//! Progress reporting for deliberation runs

use colored::Colorize;
use council_application::ports::progress::DeliberationProgress;
use council_domain::{DeliberationOutcome, GateDecision, RoundPhase, RoundRecord};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with one bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: RoundPhase) -> &'static str {
        match phase {
            RoundPhase::Broadcast => "Broadcast",
            RoundPhase::Gate => "Speaker gate",
            RoundPhase::Contribute => "Expert feedback",
            RoundPhase::Revise => "Revision",
            RoundPhase::Score => "Scoring",
        }
    }

    fn finish_phase(&self) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationProgress for ProgressReporter {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        let _ = self.multi.println(format!(
            "{} {}",
            "->".cyan(),
            format!("Round {}/{}", round, max_rounds).bold()
        ));
    }

    fn on_phase_start(&self, round: u32, phase: RoundPhase, total_tasks: usize) {
        self.finish_phase();

        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(format!("R{} {}", round, Self::phase_display_name(phase)));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_gate_decision(&self, _round: u32, decision: &GateDecision) {
        self.with_bar(|pb| {
            let mark = if decision.speaks() { "v".green() } else { "-".dimmed() };
            pb.set_message(format!("{} {}", mark, decision.expert));
            pb.inc(1);
        });
    }

    fn on_contribution(&self, _round: u32, expert: &str, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), expert)
            } else {
                format!("{} {}", "x".red(), expert)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_revision(&self, _round: u32, success: bool) {
        self.with_bar(|pb| {
            pb.set_message(if success {
                "revised".green().to_string()
            } else {
                "revision failed".red().to_string()
            });
            pb.inc(1);
        });
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        self.finish_phase();
        let _ = self.multi.println(format!(
            "   {} speaker(s), score {:.1}",
            record.speaker_count(),
            record.analysis.score
        ));
    }

    fn on_finished(&self, _outcome: &DeliberationOutcome) {
        self.finish_phase();
    }
}

/// Simple text-based progress (no fancy UI), used when stdout is not a terminal
pub struct SimpleProgress;

impl SimpleProgress {
    fn gate_line(decision: &GateDecision) -> String {
        let mark = if decision.speaks() { "v".green() } else { "-".dimmed() };
        format!("    {} {}: {}", mark, decision.expert, decision.reason)
    }

    fn contribution_line(expert: &str, success: bool) -> String {
        if success {
            format!("    {} {}", "v".green(), expert)
        } else {
            format!("    {} {} (failed)", "x".red(), expert)
        }
    }
}

impl DeliberationProgress for SimpleProgress {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        println!(
            "{} {}",
            "->".cyan(),
            format!("Round {}/{}", round, max_rounds).bold()
        );
    }

    fn on_phase_start(&self, _round: u32, phase: RoundPhase, total_tasks: usize) {
        if phase == RoundPhase::Gate || phase == RoundPhase::Contribute {
            println!(
                "  {} ({} tasks)",
                ProgressReporter::phase_display_name(phase),
                total_tasks
            );
        }
    }

    fn on_gate_decision(&self, _round: u32, decision: &GateDecision) {
        println!("{}", Self::gate_line(decision));
    }

    fn on_contribution(&self, _round: u32, expert: &str, success: bool) {
        println!("{}", Self::contribution_line(expert, success));
    }

    fn on_revision(&self, _round: u32, success: bool) {
        if success {
            println!("  {} revised", "v".green());
        } else {
            println!("  {} revision failed", "x".red());
        }
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        println!("  score {:.1}", record.analysis.score);
        println!();
    }
}
