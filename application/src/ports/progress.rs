//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::{DeliberationOutcome, GateDecision, RoundPhase, RoundRecord};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait DeliberationProgress: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, round: u32, max_rounds: u32);

    /// Called when a phase of the current round starts
    fn on_phase_start(&self, round: u32, phase: RoundPhase, total_tasks: usize);

    /// Called once per expert after gating
    fn on_gate_decision(&self, round: u32, decision: &GateDecision);

    /// Called when an expert contribution finishes
    fn on_contribution(&self, round: u32, expert: &str, success: bool);

    /// Called when the coordinator revision finishes
    fn on_revision(&self, round: u32, success: bool);

    /// Called after a round has been scored
    fn on_round_complete(&self, record: &RoundRecord);

    /// Called once the run has ended
    fn on_finished(&self, _outcome: &DeliberationOutcome) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}
    fn on_phase_start(&self, _round: u32, _phase: RoundPhase, _total_tasks: usize) {}
    fn on_gate_decision(&self, _round: u32, _decision: &GateDecision) {}
    fn on_contribution(&self, _round: u32, _expert: &str, _success: bool) {}
    fn on_revision(&self, _round: u32, _success: bool) {}
    fn on_round_complete(&self, _record: &RoundRecord) {}
}
