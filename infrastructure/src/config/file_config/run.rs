//! Run configuration from TOML (`[run]` section)

use council_application::DeliberationParams;
use serde::{Deserialize, Serialize};

/// Raw run-loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Round ceiling; values below the minimum are raised when applied
    pub max_rounds: u32,
    /// Recorded in the outcome, not enforced
    pub budget: f64,
    /// Fixes the cooldown draws for reproducible runs
    pub seed: Option<u64>,
    /// Run gate confirmations and contributions concurrently
    pub concurrent: bool,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        let params = DeliberationParams::default();
        Self {
            max_rounds: params.max_rounds(),
            budget: params.budget,
            seed: params.seed,
            concurrent: params.concurrent,
        }
    }
}

impl FileRunConfig {
    pub fn to_params(&self) -> DeliberationParams {
        let mut params = DeliberationParams::default()
            .with_max_rounds(self.max_rounds)
            .with_budget(self.budget);
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        if !self.concurrent {
            params = params.sequential();
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_section_applies_clamp() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[run]
max_rounds = 1
seed = 42
concurrent = false
"#,
        )
        .unwrap();
        let params = config.run.to_params();
        assert_eq!(params.max_rounds(), 3);
        assert_eq!(params.seed, Some(42));
        assert!(!params.concurrent);
        assert_eq!(params.budget, 3.0);
    }
}
