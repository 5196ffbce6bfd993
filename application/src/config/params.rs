//! Deliberation parameters: run loop control.
//!
//! [`DeliberationParams`] groups the per-run knobs of
//! [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase).
//! Thresholds and vocabularies belong to the domain's `DeliberationPolicy`.

use serde::Serialize;

/// Lowest accepted round ceiling
pub const MIN_MAX_ROUNDS: u32 = 3;

/// Run loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliberationParams {
    /// Hard round ceiling, never below [`MIN_MAX_ROUNDS`]
    max_rounds: u32,
    /// Discussion budget; recorded in the outcome, not interpreted
    pub budget: f64,
    /// Seed for the cooldown random source; `None` draws from entropy
    pub seed: Option<u64>,
    /// Run gate confirmations and contributions concurrently
    pub concurrent: bool,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            budget: 3.0,
            seed: None,
            concurrent: true,
        }
    }
}

impl DeliberationParams {
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    // ==================== Builder Methods ====================

    /// Set the round ceiling, clamped to at least [`MIN_MAX_ROUNDS`]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(MIN_MAX_ROUNDS);
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.concurrent = false;
        self
    }
}
